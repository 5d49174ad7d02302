//! Refresh Token flow exchanging a refresh token for a new access token.
//!
//! Rotation, caching, and revocation of the returned refresh token are the caller's concern; the
//! flow passes the token service response through unchanged.

// self
use crate::{
	_prelude::*,
	auth::{GrantType, TokenSecret},
	flows::{FlowOptions, TokenFlows, common},
	service::TokenResponse,
};

const REFRESH_TOKEN: &str = "Refresh token";

/// Executes the `refresh_token` grant.
#[derive(Clone, Debug)]
pub struct RefreshTokenFlow {
	flows: TokenFlows,
	options: FlowOptions,
	refresh_token: Option<TokenSecret>,
}
impl RefreshTokenFlow {
	const GRANT: GrantType = GrantType::RefreshToken;

	/// Creates a flow over the provided collaborators.
	pub fn new(flows: TokenFlows) -> Self {
		Self { flows, options: FlowOptions::default(), refresh_token: None }
	}

	/// Sets the refresh token to exchange.
	pub fn refresh_token(mut self, refresh_token: impl Into<TokenSecret>) -> Self {
		self.refresh_token = Some(refresh_token.into());

		self
	}

	/// Validates the refresh token and requests a new access token.
	pub async fn execute(&self) -> Result<TokenResponse> {
		common::instrumented_execute(Self::GRANT, async {
			let refresh_token =
				common::require(self.refresh_token.as_ref(), REFRESH_TOKEN, Self::GRANT)?;
			let endpoint = self.flows.endpoints_provider.token_endpoint();
			let parameters = self.options.request_parameters();

			self.flows
				.token_service
				.retrieve_access_token_via_refresh_token_grant(
					&endpoint,
					&self.flows.client_credentials,
					refresh_token,
					self.options.subdomain.as_ref(),
					&parameters,
				)
				.await
				.map_err(common::wrap_service_error(Self::GRANT))
		})
		.await
	}
}
impl_flow_options!(RefreshTokenFlow);

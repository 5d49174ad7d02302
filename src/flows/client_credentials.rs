//! Client Credentials flow for app-only tokens.

// self
use crate::{
	_prelude::*,
	auth::GrantType,
	flows::{FlowOptions, TokenFlows, common},
	service::TokenResponse,
};

/// Executes the `client_credentials` grant with the factory's client credentials.
///
/// No fields beyond the shared collaborators are required.
#[derive(Clone, Debug)]
pub struct ClientCredentialsTokenFlow {
	flows: TokenFlows,
	options: FlowOptions,
}
impl ClientCredentialsTokenFlow {
	const GRANT: GrantType = GrantType::ClientCredentials;

	/// Creates a flow over the provided collaborators.
	pub fn new(flows: TokenFlows) -> Self {
		Self { flows, options: FlowOptions::default() }
	}

	/// Requests an access token; exactly one token service call per invocation.
	pub async fn execute(&self) -> Result<TokenResponse> {
		common::instrumented_execute(Self::GRANT, async {
			let endpoint = self.flows.endpoints_provider.token_endpoint();
			let parameters = self.options.request_parameters();

			self.flows
				.token_service
				.retrieve_access_token_via_client_credentials_grant(
					&endpoint,
					&self.flows.client_credentials,
					self.options.subdomain.as_ref(),
					&parameters,
				)
				.await
				.map_err(common::wrap_service_error(Self::GRANT))
		})
		.await
	}
}
impl_flow_options!(ClientCredentialsTokenFlow);

//! Resource Owner Password Credentials flow.

// self
use crate::{
	_prelude::*,
	auth::{GrantType, TokenSecret},
	flows::{FlowOptions, TokenFlows, common},
	service::TokenResponse,
};

const USERNAME: &str = "Username";
const PASSWORD: &str = "Password";

/// Executes the `password` grant on behalf of a user.
///
/// `username` and `password` are required and checked in that order when the flow executes.
#[derive(Clone, Debug)]
pub struct PasswordTokenFlow {
	flows: TokenFlows,
	options: FlowOptions,
	username: Option<String>,
	password: Option<TokenSecret>,
}
impl PasswordTokenFlow {
	const GRANT: GrantType = GrantType::Password;

	/// Creates a flow over the provided collaborators.
	pub fn new(flows: TokenFlows) -> Self {
		Self { flows, options: FlowOptions::default(), username: None, password: None }
	}

	/// Sets the resource owner's username.
	pub fn username(mut self, username: impl Into<String>) -> Self {
		self.username = Some(username.into());

		self
	}

	/// Sets the resource owner's password.
	pub fn password(mut self, password: impl Into<TokenSecret>) -> Self {
		self.password = Some(password.into());

		self
	}

	/// Validates the credentials and requests an access token.
	pub async fn execute(&self) -> Result<TokenResponse> {
		common::instrumented_execute(Self::GRANT, async {
			let username = common::require(self.username.as_deref(), USERNAME, Self::GRANT)?;
			let password = common::require(self.password.as_ref(), PASSWORD, Self::GRANT)?;
			let endpoint = self.flows.endpoints_provider.token_endpoint();
			let parameters = self.options.request_parameters();

			self.flows
				.token_service
				.retrieve_access_token_via_password_grant(
					&endpoint,
					&self.flows.client_credentials,
					username,
					password,
					self.options.subdomain.as_ref(),
					&parameters,
				)
				.await
				.map_err(common::wrap_service_error(Self::GRANT))
		})
		.await
	}
}
impl_flow_options!(PasswordTokenFlow);

//! Grant-specific token flows backed by a shared [`TokenService`].
//!
//! [`TokenFlows`] holds the collaborators every flow needs (token service, endpoints provider, and
//! client credentials) and hands out one flow value per logical token request. Flows validate
//! their required fields when [`execute`](PasswordTokenFlow::execute) runs, before any request
//! leaves the process, and wrap every token service failure in [`TokenFlowError`].
//!
//! [`TokenFlowError`]: crate::error::TokenFlowError

macro_rules! impl_flow_options {
	($flow:ident) => {
		impl $flow {
			/// Sets the tenant subdomain the token service applies to the endpoint host.
			pub fn subdomain(mut self, subdomain: crate::auth::Subdomain) -> Self {
				self.options.subdomain = Some(subdomain);

				self
			}

			/// Replaces the parameters forwarded verbatim to the token endpoint.
			pub fn optional_parameters(
				mut self,
				optional_parameters: crate::_prelude::BTreeMap<String, String>,
			) -> Self {
				self.options.optional_parameters = optional_parameters;

				self
			}

			/// Sets the requested scopes.
			pub fn scopes(mut self, scopes: crate::auth::ScopeSet) -> Self {
				self.options.scopes = scopes;

				self
			}

			/// Optional settings configured so far.
			pub fn options(&self) -> &crate::flows::FlowOptions {
				&self.options
			}
		}
	};
}

pub mod client_credentials;
pub mod common;
pub mod password;
pub mod refresh;

pub use client_credentials::*;
pub use common::*;
pub use password::*;
pub use refresh::*;

// self
use crate::{
	_prelude::*,
	auth::ClientCredentials,
	config::{EndpointsProvider, ServiceConfiguration, ServiceEndpoints},
	service::TokenService,
};

/// Factory for token flows sharing one set of collaborators.
///
/// Collaborators are shared through [`Arc`] and must be safe for concurrent use; the factory and
/// every flow it creates are cheap to clone.
#[derive(Clone)]
pub struct TokenFlows {
	/// Token service executing the grants.
	pub token_service: Arc<dyn TokenService>,
	/// Single source of truth for the token endpoint.
	pub endpoints_provider: Arc<dyn EndpointsProvider>,
	/// Client credentials sent with every grant.
	pub client_credentials: ClientCredentials,
}
impl TokenFlows {
	/// Creates a factory from its collaborators.
	pub fn new(
		token_service: Arc<dyn TokenService>,
		endpoints_provider: Arc<dyn EndpointsProvider>,
		client_credentials: ClientCredentials,
	) -> Self {
		Self { token_service, endpoints_provider, client_credentials }
	}

	/// Starts a builder that reports missing collaborators as [`Error::InvalidArgument`].
	pub fn builder() -> TokenFlowsBuilder {
		TokenFlowsBuilder::default()
	}

	/// Creates a factory whose endpoints and credentials come from a service configuration.
	pub fn from_configuration(
		token_service: Arc<dyn TokenService>,
		config: &ServiceConfiguration,
	) -> Result<Self> {
		let endpoints = ServiceEndpoints::from_configuration(config)?;

		Ok(Self::new(token_service, Arc::new(endpoints), config.client_credentials()?))
	}

	/// Creates a `client_credentials` flow.
	pub fn client_credentials_token_flow(&self) -> ClientCredentialsTokenFlow {
		ClientCredentialsTokenFlow::new(self.clone())
	}

	/// Creates a resource owner `password` flow.
	pub fn password_token_flow(&self) -> PasswordTokenFlow {
		PasswordTokenFlow::new(self.clone())
	}

	/// Creates a `refresh_token` flow.
	pub fn refresh_token_flow(&self) -> RefreshTokenFlow {
		RefreshTokenFlow::new(self.clone())
	}
}
impl Debug for TokenFlows {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenFlows")
			.field("token_endpoint", &self.endpoints_provider.token_endpoint().as_str())
			.field("client_credentials", &self.client_credentials)
			.finish()
	}
}

/// Builder for [`TokenFlows`] that accepts collaborators one at a time.
#[derive(Clone, Default)]
pub struct TokenFlowsBuilder {
	/// Token service executing the grants.
	pub token_service: Option<Arc<dyn TokenService>>,
	/// Provider of the token endpoint.
	pub endpoints_provider: Option<Arc<dyn EndpointsProvider>>,
	/// Client credentials sent with every grant.
	pub client_credentials: Option<ClientCredentials>,
}
impl TokenFlowsBuilder {
	/// Sets the token service.
	pub fn token_service(mut self, token_service: Arc<dyn TokenService>) -> Self {
		self.token_service = Some(token_service);

		self
	}

	/// Sets the endpoints provider.
	pub fn endpoints_provider(mut self, endpoints_provider: Arc<dyn EndpointsProvider>) -> Self {
		self.endpoints_provider = Some(endpoints_provider);

		self
	}

	/// Sets the client credentials.
	pub fn client_credentials(mut self, client_credentials: ClientCredentials) -> Self {
		self.client_credentials = Some(client_credentials);

		self
	}

	/// Builds the factory, naming the first missing collaborator on failure.
	pub fn build(self) -> Result<TokenFlows> {
		let token_service = self
			.token_service
			.ok_or_else(|| Error::invalid_argument("TokenService must be provided."))?;
		let endpoints_provider = self
			.endpoints_provider
			.ok_or_else(|| Error::invalid_argument("EndpointsProvider must be provided."))?;
		let client_credentials = self
			.client_credentials
			.ok_or_else(|| Error::invalid_argument("ClientCredentials must be provided."))?;

		Ok(TokenFlows::new(token_service, endpoints_provider, client_credentials))
	}
}
impl Debug for TokenFlowsBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenFlowsBuilder")
			.field("token_service_set", &self.token_service.is_some())
			.field("endpoints_provider_set", &self.endpoints_provider.is_some())
			.field("client_credentials", &self.client_credentials)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		auth::{Subdomain, TokenSecret},
		config::Service,
		service::{TokenResponse, TokenServiceFuture},
	};

	struct FixedTokenService;
	impl TokenService for FixedTokenService {
		fn retrieve_access_token_via_client_credentials_grant<'a>(
			&'a self,
			_: &'a Url,
			_: &'a ClientCredentials,
			_: Option<&'a Subdomain>,
			_: &'a BTreeMap<String, String>,
		) -> TokenServiceFuture<'a> {
			Box::pin(async { Ok(TokenResponse::new("AT", Duration::minutes(5), None)) })
		}

		fn retrieve_access_token_via_password_grant<'a>(
			&'a self,
			_: &'a Url,
			_: &'a ClientCredentials,
			_: &'a str,
			_: &'a TokenSecret,
			_: Option<&'a Subdomain>,
			_: &'a BTreeMap<String, String>,
		) -> TokenServiceFuture<'a> {
			Box::pin(async { Ok(TokenResponse::new("AT", Duration::minutes(5), None)) })
		}

		fn retrieve_access_token_via_refresh_token_grant<'a>(
			&'a self,
			_: &'a Url,
			_: &'a ClientCredentials,
			_: &'a TokenSecret,
			_: Option<&'a Subdomain>,
			_: &'a BTreeMap<String, String>,
		) -> TokenServiceFuture<'a> {
			Box::pin(async { Ok(TokenResponse::new("AT", Duration::minutes(5), None)) })
		}
	}

	fn endpoints() -> Arc<dyn EndpointsProvider> {
		let base = Url::parse("https://tenant.auth.example.com").expect("Base URL should parse.");

		Arc::new(ServiceEndpoints::new(Service::Xsuaa, &base).expect("Endpoints should derive."))
	}

	fn credentials() -> ClientCredentials {
		ClientCredentials::new("sb-client", "secret").expect("Credentials should be valid.")
	}

	fn reason(err: Error) -> String {
		match err {
			Error::InvalidArgument { reason } => reason,
			other => panic!("Expected an invalid argument error, got {other:?}."),
		}
	}

	#[test]
	fn builder_names_the_first_missing_collaborator() {
		let missing_all = TokenFlows::builder().build().expect_err("Nothing was provided.");

		assert!(reason(missing_all).contains("TokenService"));

		let missing_endpoints = TokenFlows::builder()
			.token_service(Arc::new(FixedTokenService))
			.client_credentials(credentials())
			.build()
			.expect_err("Endpoints are missing.");

		assert!(reason(missing_endpoints).contains("EndpointsProvider"));

		let missing_credentials = TokenFlows::builder()
			.token_service(Arc::new(FixedTokenService))
			.endpoints_provider(endpoints())
			.build()
			.expect_err("Credentials are missing.");

		assert!(reason(missing_credentials).contains("ClientCredentials"));
	}

	#[test]
	fn from_configuration_derives_endpoints_and_credentials() {
		let config = ServiceConfiguration::builder(Service::Ias)
			.client_id("ias-client")
			.client_secret("secret")
			.url("https://tenant.accounts.example.com")
			.build()
			.expect("Configuration should build.");
		let flows = TokenFlows::from_configuration(Arc::new(FixedTokenService), &config)
			.expect("Factory should build from configuration.");

		assert_eq!(
			flows.endpoints_provider.token_endpoint().as_str(),
			"https://tenant.accounts.example.com/oauth2/token"
		);
		assert_eq!(flows.client_credentials.id(), "ias-client");
		assert!(!format!("{flows:?}").contains("\"secret\""));
	}

	#[test]
	fn from_configuration_requires_url() {
		let config = ServiceConfiguration::builder(Service::Xsuaa)
			.client_id("sb-client")
			.client_secret("secret")
			.build()
			.expect("Configuration should build.");
		let err = TokenFlows::from_configuration(Arc::new(FixedTokenService), &config)
			.expect_err("Configurations without url cannot resolve endpoints.");

		assert!(matches!(err, Error::Config(_)));
	}
}

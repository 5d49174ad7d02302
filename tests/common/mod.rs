//! Shared doubles and fixtures for the integration tests.

#![allow(dead_code, unused_imports)]

pub use std::{
	collections::BTreeMap,
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
};

pub use parking_lot::Mutex;
pub use time::Duration;
pub use url::Url;

// self
#[cfg(feature = "reqwest")]
use oauth2_token_client::{
	http::ReqwestHttpClient,
	oauth::{ReqwestTokenService, ReqwestTransportErrorMapper},
	reqwest::{Client as ReqwestClient, redirect::Policy},
};
use oauth2_token_client::{
	auth::{ClientCredentials, GrantType, Subdomain, TokenSecret},
	config::EndpointsProvider,
	flows::TokenFlows,
	jwt::PrivateKey,
	service::{ServiceError, TokenResponse, TokenService, TokenServiceFuture},
};

pub const CLIENT_ID: &str = "sb-client!t42";
pub const CLIENT_SECRET: &str = "client-secret";
pub const TOKEN_ENDPOINT: &str = "https://provider.auth.example.com/oauth/token";
pub const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/rsa_private_key.pem");
pub const PUBLIC_KEY_PEM: &str = include_str!("../fixtures/rsa_public_key.pem");

type Responder = Box<dyn Fn() -> Result<TokenResponse, ServiceError> + Send + Sync>;

/// Arguments captured from a single token service call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
	pub grant: GrantType,
	pub endpoint: Url,
	pub client_id: String,
	pub client_secret: String,
	pub username: Option<String>,
	pub password: Option<String>,
	pub refresh_token: Option<String>,
	pub subdomain: Option<String>,
	pub parameters: BTreeMap<String, String>,
}
impl RecordedCall {
	fn new(
		grant: GrantType,
		endpoint: &Url,
		credentials: &ClientCredentials,
		subdomain: Option<&Subdomain>,
		parameters: &BTreeMap<String, String>,
	) -> Self {
		Self {
			grant,
			endpoint: endpoint.clone(),
			client_id: credentials.id().to_owned(),
			client_secret: credentials.secret().to_owned(),
			username: None,
			password: None,
			refresh_token: None,
			subdomain: subdomain.map(|value| value.to_string()),
			parameters: parameters.clone(),
		}
	}
}

/// Token service double that records every call and answers with a configured result.
pub struct RecordingTokenService {
	calls: Mutex<Vec<RecordedCall>>,
	responder: Responder,
}
impl RecordingTokenService {
	pub fn responding(
		responder: impl 'static + Send + Sync + Fn() -> Result<TokenResponse, ServiceError>,
	) -> Arc<Self> {
		Arc::new(Self { calls: Mutex::new(Vec::new()), responder: Box::new(responder) })
	}

	pub fn succeeding() -> Arc<Self> {
		Self::responding(|| Ok(fixed_response()))
	}

	pub fn calls(&self) -> Vec<RecordedCall> {
		self.calls.lock().clone()
	}

	fn record(&self, call: RecordedCall) -> TokenServiceFuture<'_> {
		self.calls.lock().push(call);

		let result = (self.responder)();

		Box::pin(async move { result })
	}
}
impl TokenService for RecordingTokenService {
	fn retrieve_access_token_via_client_credentials_grant<'a>(
		&'a self,
		token_endpoint: &'a Url,
		credentials: &'a ClientCredentials,
		subdomain: Option<&'a Subdomain>,
		optional_parameters: &'a BTreeMap<String, String>,
	) -> TokenServiceFuture<'a> {
		self.record(RecordedCall::new(
			GrantType::ClientCredentials,
			token_endpoint,
			credentials,
			subdomain,
			optional_parameters,
		))
	}

	fn retrieve_access_token_via_password_grant<'a>(
		&'a self,
		token_endpoint: &'a Url,
		credentials: &'a ClientCredentials,
		username: &'a str,
		password: &'a TokenSecret,
		subdomain: Option<&'a Subdomain>,
		optional_parameters: &'a BTreeMap<String, String>,
	) -> TokenServiceFuture<'a> {
		let mut call = RecordedCall::new(
			GrantType::Password,
			token_endpoint,
			credentials,
			subdomain,
			optional_parameters,
		);

		call.username = Some(username.to_owned());
		call.password = Some(password.expose().to_owned());

		self.record(call)
	}

	fn retrieve_access_token_via_refresh_token_grant<'a>(
		&'a self,
		token_endpoint: &'a Url,
		credentials: &'a ClientCredentials,
		refresh_token: &'a TokenSecret,
		subdomain: Option<&'a Subdomain>,
		optional_parameters: &'a BTreeMap<String, String>,
	) -> TokenServiceFuture<'a> {
		let mut call = RecordedCall::new(
			GrantType::RefreshToken,
			token_endpoint,
			credentials,
			subdomain,
			optional_parameters,
		);

		call.refresh_token = Some(refresh_token.expose().to_owned());

		self.record(call)
	}
}

/// Endpoints provider returning a fixed token endpoint.
pub struct StaticEndpoints(pub Url);
impl EndpointsProvider for StaticEndpoints {
	fn token_endpoint(&self) -> Url {
		self.0.clone()
	}
}

pub fn token_endpoint() -> Url {
	Url::parse(TOKEN_ENDPOINT).expect("Token endpoint fixture should parse.")
}

pub fn credentials() -> ClientCredentials {
	ClientCredentials::new(CLIENT_ID, CLIENT_SECRET).expect("Credential fixtures should be valid.")
}

pub fn fixed_response() -> TokenResponse {
	TokenResponse::new("AT1", Duration::seconds(3600), Some("RT1".into()))
}

pub fn flows(service: Arc<RecordingTokenService>) -> TokenFlows {
	TokenFlows::builder()
		.token_service(service)
		.endpoints_provider(Arc::new(StaticEndpoints(token_endpoint())))
		.client_credentials(credentials())
		.build()
		.expect("Token flows should build with every collaborator present.")
}

pub fn subdomain(value: &str) -> Subdomain {
	Subdomain::new(value).expect("Subdomain fixture should be valid.")
}

pub fn private_key() -> PrivateKey {
	PrivateKey::from_pkcs8_pem(PRIVATE_KEY_PEM).expect("Private key fixture should decode.")
}

/// Service error raised by doubles to simulate a provider outage.
pub fn outage() -> ServiceError {
	ServiceError::TokenEndpoint {
		message: "temporarily_unavailable".into(),
		status: Some(503),
		retry_after: Some(Duration::seconds(30)),
	}
}

/// Builds a reqwest HTTP client that accepts the self-signed certificates served by `httpmock`.
#[cfg(feature = "reqwest")]
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = ReqwestClient::builder()
		.redirect(Policy::none())
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()
		.expect("Insecure reqwest client for tests should build.");

	ReqwestHttpClient::with_client(client)
}

/// Reqwest-backed token service wired to [`test_reqwest_http_client`].
#[cfg(feature = "reqwest")]
pub fn test_token_service() -> Arc<ReqwestTokenService> {
	Arc::new(ReqwestTokenService::with_http_client(
		test_reqwest_http_client(),
		ReqwestTransportErrorMapper,
	))
}

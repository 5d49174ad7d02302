//! HTTP-backed [`TokenService`] built on the `oauth2` crate.
//!
//! [`HttpTokenService`] issues exactly one token request per call. It resolves the tenant
//! subdomain against the token endpoint host, authenticates the client, forwards optional
//! parameters verbatim, and classifies every failure into a [`ServiceError`] carrying the HTTP
//! status and Retry-After hint captured by the transport.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError, RefreshToken,
	RequestTokenError, ResourceOwnerPassword, ResourceOwnerUsername, TokenResponse as _, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError, BasicTokenResponse},
};
use url::Host;
// self
use crate::{
	_prelude::*,
	auth::{ClientCredentials, GrantType, Subdomain, TokenSecret},
	http::{ResponseMetadata, ResponseMetadataSlot, TokenHttpClient},
	service::{RejectionKind, ServiceError, TokenResponse, TokenService, TokenServiceFuture},
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestHttpClient};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

const BODY_PREVIEW_LIMIT: usize = 256;

#[cfg(feature = "reqwest")]
/// Token service specialized for the crate's default reqwest transport stack.
pub type ReqwestTokenService = HttpTokenService<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Client authentication method applied to every token request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
	/// HTTP Basic authentication with the client id and secret.
	ClientSecretBasic,
	/// Client id and secret sent as form fields.
	#[default]
	ClientSecretPost,
}

/// Maps HTTP transport failures into [`ServiceError`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a service failure.
	fn map_transport_error(
		&self,
		grant: GrantType,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> ServiceError;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		_grant: GrantType,
		meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> ServiceError {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(meta, *inner),
			HttpClientError::Http(inner) => ServiceError::request(inner),
			HttpClientError::Io(inner) => ServiceError::Io(inner),
			HttpClientError::Other(message) => map_generic_transport_error(meta, message),
			_ => map_unknown_transport_error(meta),
		}
	}
}

/// [`TokenService`] that posts grants to the token endpoint through a [`TokenHttpClient`].
///
/// A fresh `oauth2` client is assembled per call because the endpoint and credentials are
/// supplied by the flow on every request; the HTTP transport itself is shared.
pub struct HttpTokenService<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	http_client: Arc<C>,
	error_mapper: Arc<M>,
	auth_method: ClientAuthMethod,
}
impl<C, M> HttpTokenService<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a token service that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			error_mapper: error_mapper.into(),
			auth_method: ClientAuthMethod::default(),
		}
	}

	/// Overrides the client authentication method (defaults to form fields).
	pub fn client_auth_method(mut self, method: ClientAuthMethod) -> Self {
		self.auth_method = method;

		self
	}

	fn oauth_client(
		&self,
		token_endpoint: &Url,
		credentials: &ClientCredentials,
		subdomain: Option<&Subdomain>,
	) -> ConfiguredBasicClient {
		let token_url = TokenUrl::from_url(replace_subdomain(token_endpoint, subdomain));
		let client = BasicClient::new(ClientId::new(credentials.id().to_owned()))
			.set_client_secret(ClientSecret::new(credentials.secret().to_owned()))
			.set_token_uri(token_url);

		match self.auth_method {
			ClientAuthMethod::ClientSecretBasic => client.set_auth_type(AuthType::BasicAuth),
			ClientAuthMethod::ClientSecretPost => client.set_auth_type(AuthType::RequestBody),
		}
	}

	fn map_error(
		&self,
		grant: GrantType,
		meta: &ResponseMetadataSlot,
		err: BasicRequestTokenError<HttpClientError<C::TransportError>>,
	) -> ServiceError {
		map_request_error(grant, meta.take(), err, self.error_mapper.as_ref())
	}
}
#[cfg(feature = "reqwest")]
impl HttpTokenService<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a token service backed by a default reqwest client.
	pub fn new() -> Self {
		Self::with_http_client(ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}

	/// Creates a token service whose requests fail with [`ServiceError::TokenEndpoint`] after
	/// `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		let http_client = ReqwestHttpClient::with_timeout(timeout)?;

		Ok(Self::with_http_client(http_client, ReqwestTransportErrorMapper))
	}
}
#[cfg(feature = "reqwest")]
impl Default for HttpTokenService<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	fn default() -> Self {
		Self::new()
	}
}
impl<C, M> Clone for HttpTokenService<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			error_mapper: Arc::clone(&self.error_mapper),
			auth_method: self.auth_method,
		}
	}
}
impl<C, M> Debug for HttpTokenService<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HttpTokenService").field("auth_method", &self.auth_method).finish()
	}
}
impl<C, M> TokenService for HttpTokenService<C, M>
where
	C: ?Sized + TokenHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn retrieve_access_token_via_client_credentials_grant<'a>(
		&'a self,
		token_endpoint: &'a Url,
		credentials: &'a ClientCredentials,
		subdomain: Option<&'a Subdomain>,
		optional_parameters: &'a BTreeMap<String, String>,
	) -> TokenServiceFuture<'a> {
		const GRANT: GrantType = GrantType::ClientCredentials;

		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let instrumented = self.http_client.with_metadata(meta.clone());
			let client = self.oauth_client(token_endpoint, credentials, subdomain);
			let mut request = client.exchange_client_credentials();

			for (name, value) in optional_parameters {
				request = request.add_extra_param(name, value);
			}

			let response = request
				.request_async(&instrumented)
				.await
				.map_err(|err| self.map_error(GRANT, &meta, err))?;

			map_token_response(response)
		})
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
		const GRANT: GrantType = GrantType::Password;

		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let instrumented = self.http_client.with_metadata(meta.clone());
			let client = self.oauth_client(token_endpoint, credentials, subdomain);
			let username = ResourceOwnerUsername::new(username.to_owned());
			let password = ResourceOwnerPassword::new(password.expose().to_owned());
			let mut request = client.exchange_password(&username, &password);

			for (name, value) in optional_parameters {
				request = request.add_extra_param(name, value);
			}

			let response = request
				.request_async(&instrumented)
				.await
				.map_err(|err| self.map_error(GRANT, &meta, err))?;

			map_token_response(response)
		})
	}

	fn retrieve_access_token_via_refresh_token_grant<'a>(
		&'a self,
		token_endpoint: &'a Url,
		credentials: &'a ClientCredentials,
		refresh_token: &'a TokenSecret,
		subdomain: Option<&'a Subdomain>,
		optional_parameters: &'a BTreeMap<String, String>,
	) -> TokenServiceFuture<'a> {
		const GRANT: GrantType = GrantType::RefreshToken;

		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let instrumented = self.http_client.with_metadata(meta.clone());
			let client = self.oauth_client(token_endpoint, credentials, subdomain);
			let refresh_token = RefreshToken::new(refresh_token.expose().to_owned());
			let mut request = client.exchange_refresh_token(&refresh_token);

			for (name, value) in optional_parameters {
				request = request.add_extra_param(name, value);
			}

			let response = request
				.request_async(&instrumented)
				.await
				.map_err(|err| self.map_error(GRANT, &meta, err))?;

			map_token_response(response)
		})
	}
}

/// Replaces the first label of a domain host with `subdomain`.
///
/// IP hosts, single-label hosts, and a missing subdomain leave the endpoint unchanged.
pub fn replace_subdomain(endpoint: &Url, subdomain: Option<&Subdomain>) -> Url {
	let (Some(subdomain), Some(Host::Domain(host))) = (subdomain, endpoint.host()) else {
		return endpoint.clone();
	};
	let Some((_, parent)) = host.split_once('.') else {
		return endpoint.clone();
	};
	let mut url = endpoint.clone();

	match url.set_host(Some(&format!("{subdomain}.{parent}"))) {
		Ok(()) => url,
		Err(_) => endpoint.clone(),
	}
}

fn map_token_response(response: BasicTokenResponse) -> Result<TokenResponse, ServiceError> {
	let expires_in = response.expires_in().ok_or(ServiceError::MissingExpiresIn)?.as_secs();
	let expires_in = i64::try_from(expires_in).map_err(|_| ServiceError::ExpiresInOutOfRange)?;

	if expires_in <= 0 {
		return Err(ServiceError::NonPositiveExpiresIn);
	}

	Ok(TokenResponse::new(
		response.access_token().secret().to_owned(),
		Duration::seconds(expires_in),
		response.refresh_token().map(|token| token.secret().to_owned()),
	))
}

fn map_request_error<E, M>(
	grant: GrantType,
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> ServiceError
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let meta_ref = meta.as_ref();

	match err {
		RequestTokenError::ServerResponse(response) => map_server_response_error(response, meta_ref),
		RequestTokenError::Request(error) => mapper.map_transport_error(grant, meta_ref, error),
		RequestTokenError::Parse(error, body) => map_parse_error(error, &body, meta_ref),
		RequestTokenError::Other(message) => ServiceError::TokenEndpoint {
			message: format!("Token endpoint returned an unexpected response: {message}."),
			status: meta_status(meta_ref),
			retry_after: meta_retry_after(meta_ref),
		},
	}
}

fn map_server_response_error(
	response: BasicErrorResponse,
	meta: Option<&ResponseMetadata>,
) -> ServiceError {
	let code = response.error().as_ref().to_owned();
	let description = response.error_description().map(String::as_str);
	let message = match description {
		Some(description) => format!("{code}: {description}"),
		None => code.clone(),
	};
	let status = meta_status(meta);

	match classify_oauth_error(&code).or_else(|| classify_status(status)) {
		Some(kind) => ServiceError::Rejected { kind, message, status },
		None => ServiceError::TokenEndpoint {
			message,
			status,
			retry_after: meta_retry_after(meta),
		},
	}
}

fn map_parse_error(
	source: serde_path_to_error::Error<serde_json::Error>,
	body: &[u8],
	meta: Option<&ResponseMetadata>,
) -> ServiceError {
	let status = meta_status(meta);

	if !status.is_some_and(|code| code >= 400) {
		return ServiceError::TokenResponseParse { source, status };
	}

	let message = format!("HTTP {}: {}", status.unwrap_or_default(), body_preview(body));

	match classify_status(status) {
		Some(kind) => ServiceError::Rejected { kind, message, status },
		None => ServiceError::TokenEndpoint { message, status, retry_after: meta_retry_after(meta) },
	}
}

fn classify_oauth_error(code: &str) -> Option<RejectionKind> {
	if code.eq_ignore_ascii_case("invalid_grant") || code.eq_ignore_ascii_case("access_denied") {
		Some(RejectionKind::InvalidGrant)
	} else if code.eq_ignore_ascii_case("invalid_client")
		|| code.eq_ignore_ascii_case("unauthorized_client")
	{
		Some(RejectionKind::InvalidClient)
	} else if code.eq_ignore_ascii_case("invalid_scope")
		|| code.eq_ignore_ascii_case("insufficient_scope")
	{
		Some(RejectionKind::InvalidScope)
	} else {
		None
	}
}

// `None` means the failure is worth retrying.
fn classify_status(status: Option<u16>) -> Option<RejectionKind> {
	match status? {
		400 | 404 | 410 => Some(RejectionKind::InvalidGrant),
		401 => Some(RejectionKind::InvalidClient),
		403 => Some(RejectionKind::InvalidScope),
		_ => None,
	}
}

fn body_preview(body: &[u8]) -> String {
	let text = String::from_utf8_lossy(body);

	if text.chars().count() <= BODY_PREVIEW_LIMIT {
		return text.into_owned();
	}

	let mut preview: String = text.chars().take(BODY_PREVIEW_LIMIT).collect();

	preview.push('…');

	preview
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(meta: Option<&ResponseMetadata>, err: ReqwestError) -> ServiceError {
	if err.is_builder() {
		return ServiceError::request(err);
	}
	if err.is_timeout() {
		return ServiceError::TokenEndpoint {
			message: "Request timed out while calling the token endpoint.".into(),
			status: meta_status(meta).or_else(|| err.status().map(|code| code.as_u16())),
			retry_after: meta_retry_after(meta),
		};
	}

	ServiceError::network(err)
}

#[cfg(feature = "reqwest")]
fn map_generic_transport_error(
	meta: Option<&ResponseMetadata>,
	message: impl Display,
) -> ServiceError {
	ServiceError::TokenEndpoint {
		message: format!("HTTP client error occurred while calling the token endpoint: {message}."),
		status: meta_status(meta),
		retry_after: meta_retry_after(meta),
	}
}

#[cfg(feature = "reqwest")]
fn map_unknown_transport_error(meta: Option<&ResponseMetadata>) -> ServiceError {
	ServiceError::TokenEndpoint {
		message: "HTTP client error occurred while calling the token endpoint.".into(),
		status: meta_status(meta),
		retry_after: meta_retry_after(meta),
	}
}

fn meta_status(meta: Option<&ResponseMetadata>) -> Option<u16> {
	meta.and_then(|value| value.status)
}

fn meta_retry_after(meta: Option<&ResponseMetadata>) -> Option<Duration> {
	meta.and_then(|value| value.retry_after)
}

//! Token service port consumed by the flows, plus its response and failure types.
//!
//! A [`TokenService`] executes exactly one token request per call. Retries, caching, timeouts, and
//! subdomain handling belong to the implementation; the flows only shape requests and validate
//! preconditions. [`crate::oauth::HttpTokenService`] is the built-in implementation.

// self
use crate::{
	_prelude::*,
	auth::{ClientCredentials, Subdomain, TokenSecret},
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by [`TokenService`] methods.
pub type TokenServiceFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TokenResponse, ServiceError>> + 'a + Send>>;

/// Retrieves access tokens from an authorization server, one method per grant.
///
/// Implementations are shared by many flow instances and must be safe for concurrent use.
pub trait TokenService: Send + Sync {
	/// Executes the `client_credentials` grant.
	fn retrieve_access_token_via_client_credentials_grant<'a>(
		&'a self,
		token_endpoint: &'a Url,
		credentials: &'a ClientCredentials,
		subdomain: Option<&'a Subdomain>,
		optional_parameters: &'a BTreeMap<String, String>,
	) -> TokenServiceFuture<'a>;

	/// Executes the resource owner `password` grant.
	fn retrieve_access_token_via_password_grant<'a>(
		&'a self,
		token_endpoint: &'a Url,
		credentials: &'a ClientCredentials,
		username: &'a str,
		password: &'a TokenSecret,
		subdomain: Option<&'a Subdomain>,
		optional_parameters: &'a BTreeMap<String, String>,
	) -> TokenServiceFuture<'a>;

	/// Executes the `refresh_token` grant.
	fn retrieve_access_token_via_refresh_token_grant<'a>(
		&'a self,
		token_endpoint: &'a Url,
		credentials: &'a ClientCredentials,
		refresh_token: &'a TokenSecret,
		subdomain: Option<&'a Subdomain>,
		optional_parameters: &'a BTreeMap<String, String>,
	) -> TokenServiceFuture<'a>;
}

/// Successful token endpoint response.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
	/// Access token; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Lifetime of the access token as reported by the provider.
	pub expires_in: Duration,
	/// Refresh token, if the provider issued one.
	pub refresh_token: Option<TokenSecret>,
}
impl TokenResponse {
	/// Creates a response from its parts.
	pub fn new(
		access_token: impl Into<String>,
		expires_in: Duration,
		refresh_token: Option<String>,
	) -> Self {
		Self {
			access_token: TokenSecret::new(access_token),
			expires_in,
			refresh_token: refresh_token.map(TokenSecret::new),
		}
	}

	/// Returns the access token value.
	pub fn access_token(&self) -> &str {
		self.access_token.expose()
	}

	/// Returns the refresh token value, if any.
	pub fn refresh_token(&self) -> Option<&str> {
		self.refresh_token.as_ref().map(TokenSecret::expose)
	}

	/// Instant at which the access token expires, counted from `issued_at`.
	pub fn expires_at(&self, issued_at: OffsetDateTime) -> OffsetDateTime {
		issued_at + self.expires_in
	}
}
impl Debug for TokenResponse {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenResponse")
			.field("access_token", &"<redacted>")
			.field("expires_in", &self.expires_in)
			.field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
			.finish()
	}
}

/// Provider-side rejection categories derived from OAuth error responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectionKind {
	/// The grant was rejected (bad credentials, code, or refresh token).
	InvalidGrant,
	/// Client authentication failed.
	InvalidClient,
	/// Requested scopes exceed what the client may obtain.
	InvalidScope,
}

/// Single failure kind reported by [`TokenService`] implementations.
#[derive(Debug, ThisError)]
pub enum ServiceError {
	/// The provider rejected the request with an OAuth error response.
	#[error("Token endpoint rejected the request: {message}")]
	Rejected {
		/// Rejection category.
		kind: RejectionKind,
		/// Provider supplied description.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Temporary or unexpected provider failure, including timeouts.
	#[error("Token endpoint returned an unexpected response: {message}")]
	TokenEndpoint {
		/// Message summarizing the failure.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// The token endpoint answered with malformed JSON.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Network failure (DNS, TCP, TLS).
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// IO failure surfaced by the transport.
	#[error("I/O error occurred while calling the token endpoint.")]
	Io(#[from] std::io::Error),
	/// The request could not be assembled (invalid endpoint, HTTP builder failure).
	#[error("Token request could not be built.")]
	Request {
		/// Underlying builder failure.
		#[source]
		source: BoxError,
	},
	/// Response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Response carried an `expires_in` beyond the supported range.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Response carried a non-positive `expires_in`.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
}
impl ServiceError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a request construction error.
	pub fn request(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Request { source: Box::new(src) }
	}

	/// HTTP status code associated with the failure, when known.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. }
			| Self::TokenEndpoint { status, .. }
			| Self::TokenResponseParse { status, .. } => *status,
			_ => None,
		}
	}

	/// Returns true for failures worth retrying with backoff.
	pub fn is_transient(&self) -> bool {
		matches!(self, Self::TokenEndpoint { .. } | Self::Network { .. } | Self::Io(_))
	}
}

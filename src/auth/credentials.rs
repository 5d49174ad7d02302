//! Client identifier and secret pair presented to the token endpoint.

// self
use crate::{
	_prelude::*,
	auth::{ClientId, IdentifierError, TokenSecret},
};

/// Client identifier and secret used to authenticate against the token endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientCredentials {
	/// OAuth 2.0 client identifier.
	pub client_id: ClientId,
	/// Client secret; redacted in logs.
	pub client_secret: TokenSecret,
}
impl ClientCredentials {
	/// Creates credentials after validating the client identifier.
	pub fn new(
		client_id: impl AsRef<str>,
		client_secret: impl Into<String>,
	) -> Result<Self, IdentifierError> {
		Ok(Self { client_id: ClientId::new(client_id)?, client_secret: TokenSecret::new(client_secret) })
	}

	/// Returns the client identifier as a string slice.
	pub fn id(&self) -> &str {
		&self.client_id
	}

	/// Returns the client secret. Callers must avoid logging this string.
	pub fn secret(&self) -> &str {
		self.client_secret.expose()
	}
}

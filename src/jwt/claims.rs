//! Claim names and the claims-resource loader.

// std
use std::{fs, path::Path};
// crates.io
use serde_json::{Map, Value};
// self
use crate::error::ClaimsResourceError;

/// Expiration time, in seconds since the Unix epoch.
pub const EXPIRATION: &str = "exp";
/// Granted scopes.
pub const SCOPES: &str = "scope";
/// Header parameter naming the signature algorithm.
pub const HEADER_ALGORITHM: &str = "alg";
/// Header parameter naming the media type.
pub const HEADER_TYPE: &str = "typ";
/// Value of the `typ` header parameter.
pub const JWT_TYPE: &str = "JWT";

/// Reads a JSON object from `path` into a claim map.
pub fn load_claims(path: impl AsRef<Path>) -> Result<Map<String, Value>, ClaimsResourceError> {
	let path = path.as_ref();
	let display = path.display().to_string();
	let bytes =
		fs::read(path).map_err(|source| ClaimsResourceError::Io { path: display.clone(), source })?;
	let mut de = serde_json::Deserializer::from_slice(&bytes);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| ClaimsResourceError::Parse { path: display, source })
}

//! Crate-level error types shared across flows, the JWT builder, and configuration.

// self
use crate::{
	_prelude::*,
	auth::{GrantType, IdentifierError},
	service::ServiceError,
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Service configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// A required flow field was unset when `execute` ran.
	#[error(transparent)]
	FlowValidation(#[from] FlowValidationError),
	/// Token signing failed; every cryptographic failure mode ends up here.
	#[error(transparent)]
	Signing(#[from] SigningError),
	/// The token service reported a failure while executing a grant.
	#[error(transparent)]
	TokenFlow(#[from] TokenFlowError),
	/// A claims resource could not be read.
	#[error(transparent)]
	ClaimsResource(#[from] ClaimsResourceError),

	/// Malformed or missing construction input.
	#[error("Invalid argument: {reason}")]
	InvalidArgument {
		/// Human readable reason naming the offending input.
		reason: String,
	},
}
impl Error {
	/// Builds an [`Error::InvalidArgument`] from any displayable reason.
	pub fn invalid_argument(reason: impl Into<String>) -> Self {
		Self::InvalidArgument { reason: reason.into() }
	}
}
impl From<IdentifierError> for Error {
	fn from(e: IdentifierError) -> Self {
		Self::invalid_argument(e.to_string())
	}
}

/// Configuration failures raised while assembling service configuration or transports.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A URL property cannot be parsed.
	#[error("Property `{property}` is not a valid URL.")]
	InvalidUrl {
		/// Property holding the URL.
		property: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A property required by the caller is missing.
	#[error("Service configuration is missing the `{name}` property.")]
	MissingProperty {
		/// Property name.
		name: &'static str,
	},
	/// Legacy mode was requested for a service that has no legacy mode.
	#[error("Legacy mode is not supported for service {service}.")]
	LegacyModeUnsupported {
		/// Service label.
		service: &'static str,
	},
	/// Service configuration JSON could not be parsed.
	#[error("Service configuration JSON is malformed.")]
	Parse(#[from] serde_path_to_error::Error<serde_json::Error>),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Raised by `execute` when a required flow field is unset; never reaches the network.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum FlowValidationError {
	/// Required field was not configured.
	#[error("{field} must be set before executing the {grant} flow.")]
	MissingField {
		/// Field label, e.g. `Username`.
		field: &'static str,
		/// Grant whose flow was executed.
		grant: GrantType,
	},
}

/// Single failure kind for JWT signing, carrying the underlying message.
#[derive(Debug, ThisError)]
#[error("Failed to sign token: {message}")]
pub struct SigningError {
	/// Message of the original failure.
	pub message: String,
	/// Original failure, when one exists.
	#[source]
	pub source: Option<BoxError>,
}
impl SigningError {
	/// Creates a signing error from the original failure, keeping its message.
	pub fn from_source(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self { message: src.to_string(), source: Some(Box::new(src)) }
	}

	/// Creates a signing error without an underlying source.
	pub fn message(message: impl Into<String>) -> Self {
		Self { message: message.into(), source: None }
	}
}
impl From<crate::jwt::SignatureError> for SigningError {
	fn from(e: crate::jwt::SignatureError) -> Self {
		Self::from_source(e)
	}
}

/// Wraps any [`ServiceError`] surfaced while a flow executed its grant.
#[derive(Debug, ThisError)]
#[error("Error requesting an access token via the {grant} grant: {source}")]
pub struct TokenFlowError {
	/// Grant that was executed.
	pub grant: GrantType,
	/// Failure reported by the token service, unmodified.
	#[source]
	pub source: ServiceError,
}
impl TokenFlowError {
	/// Wraps a token service failure for the provided grant.
	pub fn new(grant: GrantType, source: ServiceError) -> Self {
		Self { grant, source }
	}
}

/// Failures raised while loading claims from an external resource.
#[derive(Debug, ThisError)]
pub enum ClaimsResourceError {
	/// Resource could not be read.
	#[error("Claims resource `{path}` could not be read.")]
	Io {
		/// Resource path.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Resource is not a JSON object.
	#[error("Claims resource `{path}` is not a JSON object.")]
	Parse {
		/// Resource path.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

// self
use crate::{
	_prelude::*,
	config::{Service, ServiceConfiguration, URL},
	error::ConfigError,
};

/// Resolves the token endpoint a flow hands to its token service.
///
/// Implementations are shared across flow instances and must be `Send + Sync`. The provider is the
/// single source of truth for the endpoint; flows never build URIs themselves.
pub trait EndpointsProvider: Send + Sync {
	/// Absolute token endpoint URI.
	fn token_endpoint(&self) -> Url;
}

/// Default endpoint set derived from a service base URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
	/// Token endpoint used by every grant.
	pub token: Url,
	/// Authorization endpoint for browser based flows.
	pub authorize: Url,
	/// JSON Web Key Set endpoint.
	pub jwks: Url,
}
impl ServiceEndpoints {
	/// Derives the well-known endpoints of `service` from its base URL.
	///
	/// Endpoint paths are appended to any path the base URL already carries, so
	/// `https://host.example.com/uaa` yields `https://host.example.com/uaa/oauth/token`. Query
	/// and fragment of the base URL are dropped.
	pub fn new(service: Service, base: &Url) -> Result<Self, ConfigError> {
		Ok(Self {
			token: append_path(base, service.token_path())?,
			authorize: append_path(base, service.authorize_path())?,
			jwks: append_path(base, service.jwks_path())?,
		})
	}

	/// Derives the endpoints from a configuration's `url` property.
	pub fn from_configuration(config: &ServiceConfiguration) -> Result<Self, ConfigError> {
		Self::new(config.service(), config.require_url()?)
	}
}
impl EndpointsProvider for ServiceEndpoints {
	fn token_endpoint(&self) -> Url {
		self.token.clone()
	}
}

fn append_path(base: &Url, path: &str) -> Result<Url, ConfigError> {
	let mut endpoint = base.clone();

	endpoint.set_query(None);
	endpoint.set_fragment(None);
	endpoint
		.path_segments_mut()
		.map_err(|()| ConfigError::InvalidUrl {
			property: URL,
			source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
		})?
		.pop_if_empty()
		.extend(path.trim_start_matches('/').split('/'));

	Ok(endpoint)
}

// self
use crate::_prelude::*;

/// Property holding the OAuth 2.0 client identifier.
pub const CLIENT_ID: &str = "clientid";
/// Property holding the OAuth 2.0 client secret.
pub const CLIENT_SECRET: &str = "clientsecret";
/// Property holding the identity service base URL.
pub const URL: &str = "url";
/// Property holding the UAA domain used for token key lookups.
pub const UAA_DOMAIN: &str = "uaadomain";
/// Property holding the XSUAA application name.
pub const XS_APP_NAME: &str = "xsappname";

/// Identity service kinds that issue tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
	/// XSUAA (UAA based) authorization server.
	Xsuaa,
	/// Identity Authentication Service (OIDC provider).
	Ias,
}
impl Service {
	/// Returns a stable uppercase label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Service::Xsuaa => "XSUAA",
			Service::Ias => "IAS",
		}
	}

	/// Path of the token endpoint relative to the service URL.
	pub const fn token_path(self) -> &'static str {
		match self {
			Service::Xsuaa => "/oauth/token",
			Service::Ias => "/oauth2/token",
		}
	}

	/// Path of the authorization endpoint relative to the service URL.
	pub const fn authorize_path(self) -> &'static str {
		match self {
			Service::Xsuaa => "/oauth/authorize",
			Service::Ias => "/oauth2/authorize",
		}
	}

	/// Path of the JSON Web Key Set relative to the service URL.
	pub const fn jwks_path(self) -> &'static str {
		match self {
			Service::Xsuaa => "/token_keys",
			Service::Ias => "/oauth2/certs",
		}
	}

	/// Claim carrying the client identifier in tokens this service issues.
	pub const fn client_id_claim(self) -> &'static str {
		match self {
			Service::Xsuaa => "cid",
			Service::Ias => "aud",
		}
	}
}
impl Display for Service {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

// self
use crate::{
	_prelude::*,
	auth::ClientCredentials,
	config::{CLIENT_ID, CLIENT_SECRET, Service, ServiceConfigurationBuilder, URL},
	error::ConfigError,
};

/// Immutable endpoint and credential data for one identity service instance.
///
/// Values are stored as a flat property map mirroring a service binding. The `url` property is
/// validated when the configuration is built so [`url`](Self::url) never fails afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceConfiguration {
	pub(crate) service: Service,
	pub(crate) properties: BTreeMap<String, String>,
	pub(crate) url: Option<Url>,
	pub(crate) legacy_mode: bool,
}
impl ServiceConfiguration {
	/// Creates a new builder for the provided identity service.
	pub fn builder(service: Service) -> ServiceConfigurationBuilder {
		ServiceConfigurationBuilder::new(service)
	}

	/// Parses a flat JSON credentials object, e.g. the credentials section of a service binding.
	pub fn from_json(service: Service, json: &str) -> Result<Self, ConfigError> {
		let mut de = serde_json::Deserializer::from_str(json);
		let properties: BTreeMap<String, String> = serde_path_to_error::deserialize(&mut de)?;

		Self::builder(service).properties(properties).build()
	}

	/// Identity service this configuration belongs to.
	pub fn service(&self) -> Service {
		self.service
	}

	/// Client identifier, if configured.
	pub fn client_id(&self) -> Option<&str> {
		self.property(CLIENT_ID)
	}

	/// Client secret, if configured. Callers must avoid logging this string.
	pub fn client_secret(&self) -> Option<&str> {
		self.property(CLIENT_SECRET)
	}

	/// Base URL of the service instance, if configured.
	pub fn url(&self) -> Option<&Url> {
		self.url.as_ref()
	}

	/// Returns the raw value of a property.
	pub fn property(&self, name: &str) -> Option<&str> {
		self.properties.get(name).map(String::as_str)
	}

	/// Returns true when the property is present.
	pub fn has_property(&self, name: &str) -> bool {
		self.properties.contains_key(name)
	}

	/// Returns true when the configuration targets a legacy XSUAA instance.
	pub fn is_legacy_mode(&self) -> bool {
		self.legacy_mode
	}

	/// Builds validated client credentials from the `clientid`/`clientsecret` properties.
	pub fn client_credentials(&self) -> Result<ClientCredentials> {
		let id = self.client_id().ok_or(ConfigError::MissingProperty { name: CLIENT_ID })?;
		let secret =
			self.client_secret().ok_or(ConfigError::MissingProperty { name: CLIENT_SECRET })?;

		Ok(ClientCredentials::new(id, secret)?)
	}

	/// Returns the base URL or fails when the `url` property is missing.
	pub(crate) fn require_url(&self) -> Result<&Url, ConfigError> {
		self.url().ok_or(ConfigError::MissingProperty { name: URL })
	}
}
impl Debug for ServiceConfiguration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let properties: BTreeMap<&str, &str> = self
			.properties
			.iter()
			.map(|(name, value)| {
				(name.as_str(), if name == CLIENT_SECRET { "<redacted>" } else { value.as_str() })
			})
			.collect();

		f.debug_struct("ServiceConfiguration")
			.field("service", &self.service)
			.field("properties", &properties)
			.field("legacy_mode", &self.legacy_mode)
			.finish()
	}
}

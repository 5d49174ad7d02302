// self
use crate::{
	_prelude::*,
	config::{CLIENT_ID, CLIENT_SECRET, Service, ServiceConfiguration, URL},
	error::ConfigError,
};

/// Builder for [`ServiceConfiguration`] values.
pub struct ServiceConfigurationBuilder {
	/// Identity service the configuration targets.
	pub service: Service,
	/// Raw properties; later writes replace earlier ones.
	pub properties: BTreeMap<String, String>,
	/// Whether the configuration targets a legacy XSUAA instance.
	pub legacy_mode: bool,
}
impl ServiceConfigurationBuilder {
	/// Creates a new builder for the provided identity service.
	pub fn new(service: Service) -> Self {
		Self { service, properties: BTreeMap::new(), legacy_mode: false }
	}

	/// Sets the client identifier.
	pub fn client_id(self, client_id: impl Into<String>) -> Self {
		self.property(CLIENT_ID, client_id)
	}

	/// Sets the client secret.
	pub fn client_secret(self, client_secret: impl Into<String>) -> Self {
		self.property(CLIENT_SECRET, client_secret)
	}

	/// Sets the base URL of the service instance, e.g. `https://tenant.auth.example.com`.
	pub fn url(self, url: impl Into<String>) -> Self {
		self.property(URL, url)
	}

	/// Sets or replaces a single property.
	pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.properties.insert(name.into(), value.into());

		self
	}

	/// Sets or replaces every property yielded by the iterator.
	pub fn properties<I, K, V>(mut self, properties: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		for (name, value) in properties {
			self = self.property(name, value);
		}

		self
	}

	/// Toggles legacy mode, which only XSUAA supports.
	pub fn legacy_mode(mut self, legacy_mode: bool) -> Result<Self, ConfigError> {
		if legacy_mode && self.service != Service::Xsuaa {
			return Err(ConfigError::LegacyModeUnsupported { service: self.service.as_str() });
		}

		self.legacy_mode = legacy_mode;

		Ok(self)
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ServiceConfiguration, ConfigError> {
		let url = self
			.properties
			.get(URL)
			.map(String::as_str)
			.map(Url::parse)
			.transpose()
			.map_err(|source| ConfigError::InvalidUrl { property: URL, source })?;

		Ok(ServiceConfiguration {
			service: self.service,
			properties: self.properties,
			url,
			legacy_mode: self.legacy_mode,
		})
	}
}
impl Debug for ServiceConfigurationBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ServiceConfigurationBuilder")
			.field("service", &self.service)
			.field("properties", &self.properties.keys().collect::<Vec<_>>())
			.field("legacy_mode", &self.legacy_mode)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn later_properties_replace_earlier_ones() {
		let config = ServiceConfiguration::builder(Service::Xsuaa)
			.client_id("first")
			.properties([(CLIENT_ID, "second"), ("custom", "value")])
			.build()
			.expect("Configuration should build.");

		assert_eq!(config.client_id(), Some("second"));
		assert!(config.has_property("custom"));
		assert!(!config.has_property(CLIENT_SECRET));
	}

	#[test]
	fn legacy_mode_is_xsuaa_only() {
		let xsuaa = ServiceConfiguration::builder(Service::Xsuaa)
			.legacy_mode(true)
			.expect("XSUAA supports legacy mode.")
			.build()
			.expect("Configuration should build.");

		assert!(xsuaa.is_legacy_mode());

		let err = ServiceConfiguration::builder(Service::Ias)
			.legacy_mode(true)
			.expect_err("IAS has no legacy mode.");

		assert!(matches!(err, ConfigError::LegacyModeUnsupported { service: "IAS" }));
		assert!(ServiceConfiguration::builder(Service::Ias).legacy_mode(false).is_ok());
	}

	#[test]
	fn invalid_url_is_rejected_at_build_time() {
		let err = ServiceConfiguration::builder(Service::Ias)
			.url("not a url")
			.build()
			.expect_err("Malformed URLs should be rejected.");

		assert!(matches!(err, ConfigError::InvalidUrl { property: URL, .. }));
	}
}

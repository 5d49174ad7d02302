mod common;

// self
use common::*;
use oauth2_token_client::{
	config::{EndpointsProvider, Service, ServiceConfiguration, ServiceEndpoints, UAA_DOMAIN},
	error::{ConfigError, Error},
	flows::TokenFlows,
};

const BINDING: &str = r#"{
	"clientid": "sb-na-app!t42",
	"clientsecret": "binding-secret",
	"url": "https://consumer.authentication.example.com",
	"uaadomain": "authentication.example.com",
	"xsappname": "na-app!t42"
}"#;

#[tokio::test]
async fn flows_built_from_a_binding_use_its_endpoint_and_credentials() {
	let config =
		ServiceConfiguration::from_json(Service::Xsuaa, BINDING).expect("Binding should parse.");
	let service = RecordingTokenService::succeeding();
	let flows = TokenFlows::from_configuration(service.clone(), &config)
		.expect("Flows should build from the binding.");

	flows
		.client_credentials_token_flow()
		.execute()
		.await
		.expect("Client credentials flow should succeed.");

	let calls = service.calls();

	assert_eq!(
		calls[0].endpoint.as_str(),
		"https://consumer.authentication.example.com/oauth/token"
	);
	assert_eq!(calls[0].client_id, "sb-na-app!t42");
	assert_eq!(calls[0].client_secret, "binding-secret");
	assert_eq!(config.property(UAA_DOMAIN), Some("authentication.example.com"));
}

#[test]
fn ias_endpoints_follow_the_oidc_layout() {
	let config = ServiceConfiguration::builder(Service::Ias)
		.client_id("ias-client")
		.client_secret("ias-secret")
		.url("https://tenant.accounts.example.com")
		.build()
		.expect("Configuration should build.");
	let endpoints =
		ServiceEndpoints::from_configuration(&config).expect("Endpoints should derive.");

	assert_eq!(
		endpoints.token_endpoint().as_str(),
		"https://tenant.accounts.example.com/oauth2/token"
	);
	assert_eq!(endpoints.jwks.as_str(), "https://tenant.accounts.example.com/oauth2/certs");
}

#[test]
fn legacy_mode_is_xsuaa_only() {
	let err = ServiceConfiguration::builder(Service::Ias)
		.legacy_mode(true)
		.expect_err("IAS has no legacy mode.");

	assert!(matches!(err, ConfigError::LegacyModeUnsupported { service: "IAS" }));

	let config = ServiceConfiguration::builder(Service::Xsuaa)
		.legacy_mode(true)
		.expect("XSUAA supports legacy mode.")
		.build()
		.expect("Configuration should build.");

	assert!(config.is_legacy_mode());
}

#[test]
fn invalid_urls_fail_the_build() {
	let err = ServiceConfiguration::builder(Service::Xsuaa)
		.url("not a url")
		.build()
		.expect_err("Malformed URLs must be rejected.");

	assert!(matches!(err, ConfigError::InvalidUrl { property: "url", .. }));
}

#[test]
fn flows_need_credentials_from_the_binding() {
	let config = ServiceConfiguration::builder(Service::Xsuaa)
		.url("https://consumer.authentication.example.com")
		.build()
		.expect("Configuration should build.");
	let err = TokenFlows::from_configuration(RecordingTokenService::succeeding(), &config)
		.expect_err("Client credentials are missing.");

	assert!(matches!(err, Error::Config(ConfigError::MissingProperty { name: "clientid" })));
}

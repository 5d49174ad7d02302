//! Executes the password grant against a local mock token endpoint through the reqwest token
//! service.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use oauth2_token_client::{
	auth::ScopeSet,
	config::{Service, ServiceConfiguration},
	flows::TokenFlows,
	http::ReqwestHttpClient,
	oauth::{ReqwestTokenService, ReqwestTransportErrorMapper},
	reqwest::{Client as ReqwestClient, redirect::Policy},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"bearer\",\"expires_in\":900,\"refresh_token\":\"demo-refresh\"}",
			);
		})
		.await;
	let config = ServiceConfiguration::builder(Service::Xsuaa)
		.client_id("sb-demo-app!t1")
		.client_secret("demo-secret")
		.url(server.url("/"))
		.build()?;
	// The mock server presents a self-signed certificate.
	let http_client = ReqwestClient::builder()
		.redirect(Policy::none())
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.build()?;
	let token_service = ReqwestTokenService::with_http_client(
		ReqwestHttpClient::with_client(http_client),
		ReqwestTransportErrorMapper,
	);
	let flows = TokenFlows::from_configuration(Arc::new(token_service), &config)?;
	let response = flows
		.password_token_flow()
		.username("alice")
		.password("alice-password")
		.scopes(ScopeSet::new(["openid", "demo-app!t1.Read"])?)
		.execute()
		.await?;

	println!("Client {} received {response:?}.", flows.client_credentials.id());
	println!("Refresh token issued: {}.", response.refresh_token().is_some());

	token_mock.assert_async().await;

	Ok(())
}

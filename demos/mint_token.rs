//! Mints an RS256 token for local testing and prints its segments.

// crates.io
use color_eyre::Result;
use time::{Duration, OffsetDateTime};
// self
use oauth2_token_client::{
	config::Service,
	jwt::{PrivateKey, TokenBuilder},
};

fn main() -> Result<()> {
	color_eyre::install()?;

	let key = PrivateKey::from_pkcs8_pem(include_str!("../tests/fixtures/rsa_private_key.pem"))?;
	let token = TokenBuilder::rs256(Service::Xsuaa, "sb-demo-app!t1")?
		.header_parameter("kid", "demo-key")
		.claim("user_name", "alice")
		.claim("zid", "demo-zone")
		.scopes(["openid"])
		.local_scopes(["Read", "Write"])
		.app_id("demo-app!t1")
		.expiration(OffsetDateTime::now_utc() + Duration::hours(1))
		.private_key(key)
		.build()?;

	for (name, segment) in ["header", "claims", "signature"].iter().zip(token.split('.')) {
		println!("{name}: {segment}");
	}

	Ok(())
}

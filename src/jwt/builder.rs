//! Fluent JWT builder that mints compact, optionally signed tokens.
//!
//! The builder is a plain owned value: every setter consumes and returns it, repeated calls to the
//! same setter keep the last value, and [`TokenBuilder::build`] consumes it. Signing is delegated
//! to the injected [`SignatureCalculator`] and every failure it reports surfaces as
//! [`Error::Signing`], so callers only ever handle one error kind.

// std
use std::path::Path;
// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde_json::{Map, Value};
use time::macros::datetime;
// self
use crate::{
	_prelude::*,
	auth::ClientId,
	config::Service,
	error::SigningError,
	jwt::{
		PrivateKey, RsaSignatureCalculator, SignatureAlgorithm, SignatureCalculator,
		claims::{self, EXPIRATION, HEADER_ALGORITHM, HEADER_TYPE, JWT_TYPE, SCOPES},
	},
};

/// Expiration sentinel meaning "never expires"; the `exp` claim is omitted for it.
pub const NO_EXPIRATION: OffsetDateTime = datetime!(9999-12-31 23:59:59 UTC);

/// Single-use builder for compact JWTs.
pub struct TokenBuilder {
	service: Service,
	calculator: Arc<dyn SignatureCalculator>,
	header: BTreeMap<String, String>,
	claims: Map<String, Value>,
	expiration: OffsetDateTime,
	signature_algorithm: SignatureAlgorithm,
	private_key: Option<PrivateKey>,
	scopes: Vec<String>,
	local_scopes: Vec<String>,
	app_id: Option<String>,
}
impl TokenBuilder {
	/// Creates a builder for `service` that signs through `calculator`.
	///
	/// The client identifier is written to the service's client-id claim (`cid` for XSUAA, `aud`
	/// for IAS) and can be overridden with [`claim`](Self::claim).
	pub fn new(
		service: Service,
		calculator: Arc<dyn SignatureCalculator>,
		client_id: impl AsRef<str>,
	) -> Result<Self> {
		let client_id = ClientId::new(client_id)?;
		let mut claims = Map::new();

		claims.insert(service.client_id_claim().into(), Value::String(client_id.into()));

		Ok(Self {
			service,
			calculator,
			header: BTreeMap::new(),
			claims,
			expiration: NO_EXPIRATION,
			signature_algorithm: SignatureAlgorithm::default(),
			private_key: None,
			scopes: Vec::new(),
			local_scopes: Vec::new(),
			app_id: None,
		})
	}

	/// Creates a builder backed by [`RsaSignatureCalculator`].
	pub fn rs256(service: Service, client_id: impl AsRef<str>) -> Result<Self> {
		Self::new(service, Arc::new(RsaSignatureCalculator), client_id)
	}

	/// Identity service the token is minted for.
	pub fn service(&self) -> Service {
		self.service
	}

	/// Adds a header parameter. `alg` and `typ` are always derived at build time.
	pub fn header_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.header.insert(name.into(), value.into());

		self
	}

	/// Sets a string claim.
	pub fn claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.claims.insert(name.into(), Value::String(value.into()));

		self
	}

	/// Sets a structured JSON claim.
	pub fn claim_object(mut self, name: impl Into<String>, object: Map<String, Value>) -> Self {
		self.claims.insert(name.into(), Value::Object(object));

		self
	}

	/// Sets a claim holding an array of strings.
	pub fn claim_values<I, S>(mut self, name: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let values = values.into_iter().map(|value| Value::String(value.into())).collect();

		self.claims.insert(name.into(), Value::Array(values));

		self
	}

	/// Merges every claim of the JSON object stored at `path`.
	pub fn claims_from_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
		self.claims.extend(claims::load_claims(path)?);

		Ok(self)
	}

	/// Sets the expiration instant; [`NO_EXPIRATION`] omits the `exp` claim.
	pub fn expiration(mut self, expiration: OffsetDateTime) -> Self {
		self.expiration = expiration;

		self
	}

	/// Overrides the signature algorithm (defaults to RS256).
	pub fn signature_algorithm(mut self, algorithm: SignatureAlgorithm) -> Self {
		self.signature_algorithm = algorithm;

		self
	}

	/// Sets the signing key. Without one the signature segment stays empty.
	pub fn private_key(mut self, key: PrivateKey) -> Self {
		self.private_key = Some(key);

		self
	}

	/// Sets the scopes written to the `scope` claim.
	pub fn scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Sets application-local scopes, prefixed with `<app id>.` when an app id is set.
	pub fn local_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.local_scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Sets the application id used to qualify local scopes.
	pub fn app_id(mut self, app_id: impl Into<String>) -> Self {
		self.app_id = Some(app_id.into());

		self
	}

	/// Encodes and signs the token as `header.claims.signature`.
	pub fn build(self) -> Result<String> {
		let header = self.header_object();
		let claims = self.claims_object();
		let header = serde_json::to_vec(&header).map_err(SigningError::from_source)?;
		let claims = serde_json::to_vec(&claims).map_err(SigningError::from_source)?;
		let signing_input =
			format!("{}.{}", URL_SAFE_NO_PAD.encode(header), URL_SAFE_NO_PAD.encode(claims));
		let signature = match &self.private_key {
			Some(key) => {
				let raw = self
					.calculator
					.calculate_signature(key, self.signature_algorithm, signing_input.as_bytes())
					.map_err(SigningError::from)?;

				URL_SAFE_NO_PAD.encode(raw)
			},
			None => String::new(),
		};

		Ok(format!("{signing_input}.{signature}"))
	}

	fn header_object(&self) -> Map<String, Value> {
		let mut header: Map<String, Value> = self
			.header
			.iter()
			.map(|(name, value)| (name.clone(), Value::String(value.clone())))
			.collect();

		header.insert(HEADER_ALGORITHM.into(), self.signature_algorithm.value().into());
		header.insert(HEADER_TYPE.into(), JWT_TYPE.into());

		header
	}

	fn claims_object(&self) -> Map<String, Value> {
		let mut claims = self.claims.clone();
		let local_scopes = self.local_scopes.iter().map(|scope| match &self.app_id {
			Some(app_id) => format!("{app_id}.{scope}"),
			None => scope.clone(),
		});
		let scopes: Vec<Value> =
			self.scopes.iter().cloned().chain(local_scopes).map(Value::String).collect();

		if !scopes.is_empty() {
			claims.insert(SCOPES.into(), Value::Array(scopes));
		}
		if self.expiration != NO_EXPIRATION {
			claims.insert(EXPIRATION.into(), self.expiration.unix_timestamp().into());
		}

		claims
	}
}
impl Debug for TokenBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenBuilder")
			.field("service", &self.service)
			.field("header", &self.header)
			.field("claims", &self.claims)
			.field("expiration", &self.expiration)
			.field("signature_algorithm", &self.signature_algorithm)
			.field("private_key_set", &self.private_key.is_some())
			.field("scopes", &self.scopes)
			.field("local_scopes", &self.local_scopes)
			.field("app_id", &self.app_id)
			.finish()
	}
}

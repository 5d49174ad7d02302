//! Closed registry of JWS signature algorithms (RFC 7518 `alg` / `kty`).

// self
use crate::_prelude::*;

/// Signature algorithms known to the token builder and key-set lookups.
///
/// Each variant maps to exactly one key type, so lookups by wire value or by key type yield at
/// most one match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum SignatureAlgorithm {
	/// RSASSA-PKCS1-v1_5 using SHA-256.
	#[default]
	Rs256,
	/// ECDSA using P-256 and SHA-256.
	Es256,
}
impl SignatureAlgorithm {
	/// Every variant, in declaration order.
	pub const ALL: [SignatureAlgorithm; 2] = [SignatureAlgorithm::Rs256, SignatureAlgorithm::Es256];

	/// JWK `kty` value of keys usable with this algorithm.
	pub const fn key_type(self) -> &'static str {
		match self {
			SignatureAlgorithm::Rs256 => "RSA",
			SignatureAlgorithm::Es256 => "EC",
		}
	}

	/// Value used in the JWT `alg` header and key-set lookups.
	pub const fn value(self) -> &'static str {
		match self {
			SignatureAlgorithm::Rs256 => "RS256",
			SignatureAlgorithm::Es256 => "ES256",
		}
	}

	/// Name of the underlying signature primitive.
	pub const fn native_signature(self) -> &'static str {
		match self {
			SignatureAlgorithm::Rs256 => "SHA256withRSA",
			SignatureAlgorithm::Es256 => "SHA256withECDSA",
		}
	}

	/// Looks up the variant whose wire value equals `value`.
	pub fn from_value(value: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|alg| alg.value() == value)
	}

	/// Looks up the variant whose key type equals `key_type`.
	pub fn from_key_type(key_type: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|alg| alg.key_type() == key_type)
	}
}
impl Display for SignatureAlgorithm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.value())
	}
}
impl From<SignatureAlgorithm> for &'static str {
	fn from(value: SignatureAlgorithm) -> Self {
		value.value()
	}
}
impl TryFrom<String> for SignatureAlgorithm {
	type Error = UnknownAlgorithm;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}
impl FromStr for SignatureAlgorithm {
	type Err = UnknownAlgorithm;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::from_value(s).ok_or_else(|| UnknownAlgorithm(s.to_owned()))
	}
}

/// Returned when parsing a wire value outside the registry.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Signature algorithm `{0}` is not supported.")]
pub struct UnknownAlgorithm(pub String);

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn lookups_find_registered_variants() {
		assert_eq!(SignatureAlgorithm::from_value("RS256"), Some(SignatureAlgorithm::Rs256));
		assert_eq!(SignatureAlgorithm::from_value("ES256"), Some(SignatureAlgorithm::Es256));
		assert_eq!(SignatureAlgorithm::from_key_type("RSA"), Some(SignatureAlgorithm::Rs256));
		assert_eq!(SignatureAlgorithm::from_key_type("EC"), Some(SignatureAlgorithm::Es256));
	}

	#[test]
	fn unknown_values_return_none() {
		for value in ["", "rs256", "RS384", "HS256", "none", "RSA"] {
			assert_eq!(SignatureAlgorithm::from_value(value), None, "{value} must not resolve.");
		}

		assert_eq!(SignatureAlgorithm::from_key_type("oct"), None);
		assert!("PS256".parse::<SignatureAlgorithm>().is_err());
	}

	#[test]
	fn wire_values_and_key_types_are_unique() {
		for alg in SignatureAlgorithm::ALL {
			let by_value =
				SignatureAlgorithm::ALL.iter().filter(|other| other.value() == alg.value()).count();
			let by_type = SignatureAlgorithm::ALL
				.iter()
				.filter(|other| other.key_type() == alg.key_type())
				.count();

			assert_eq!(by_value, 1);
			assert_eq!(by_type, 1);
		}
	}

	#[test]
	fn serde_uses_wire_values() {
		assert_eq!(
			serde_json::to_string(&SignatureAlgorithm::Rs256).expect("Algorithm should serialize."),
			"\"RS256\""
		);
		assert_eq!(
			serde_json::from_str::<SignatureAlgorithm>("\"ES256\"")
				.expect("Algorithm should deserialize."),
			SignatureAlgorithm::Es256
		);
	}
}

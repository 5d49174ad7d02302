//! Strongly typed identifiers validated at construction time.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal, $validate:path) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				$validate($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				$validate($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const CLIENT_ID_MAX_LEN: usize = 255;
// RFC 1035 label limit.
const SUBDOMAIN_MAX_LEN: usize = 63;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} cannot be empty.")]
	Empty {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier.
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier.
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
	/// The identifier is not a valid DNS label.
	#[error("{kind} `{value}` is not a valid DNS label.")]
	InvalidLabel {
		/// Kind of identifier.
		kind: &'static str,
		/// Rejected value.
		value: String,
	},
}

def_id! { ClientId, "OAuth 2.0 client identifier.", "ClientId", validate_client_id }
def_id! {
	Subdomain,
	"Tenant subdomain substituted into the token endpoint host by the token service.",
	"Subdomain",
	validate_subdomain
}

fn validate_client_id(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > CLIENT_ID_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: CLIENT_ID_MAX_LEN });
	}

	Ok(())
}

fn validate_subdomain(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.len() > SUBDOMAIN_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: SUBDOMAIN_MAX_LEN });
	}
	if view.starts_with('-')
		|| view.ends_with('-')
		|| !view.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
	{
		return Err(IdentifierError::InvalidLabel { kind, value: view.to_owned() });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn client_ids_reject_whitespace_and_empty_values() {
		assert!(ClientId::new("").is_err());
		assert!(ClientId::new(" sb-client").is_err(), "Leading whitespace must be rejected.");

		let client = ClientId::new("sb-client!t1234").expect("XSUAA style client ids are valid.");

		assert_eq!(client.as_ref(), "sb-client!t1234");
		assert_eq!(format!("{client:?}"), "ClientId(sb-client!t1234)");
	}

	#[test]
	fn subdomains_must_be_dns_labels() {
		Subdomain::new("staging").expect("Plain labels should be accepted.");
		Subdomain::new("tenant-42").expect("Hyphenated labels should be accepted.");

		assert!(matches!(
			Subdomain::new("a.b"),
			Err(IdentifierError::InvalidLabel { kind: "Subdomain", .. })
		));
		assert!(Subdomain::new("-edge").is_err());
		assert!(Subdomain::new("x".repeat(SUBDOMAIN_MAX_LEN + 1)).is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let subdomain: Subdomain =
			serde_json::from_str("\"tenant-a\"").expect("Subdomain should deserialize.");

		assert_eq!(subdomain.as_ref(), "tenant-a");
		assert!(serde_json::from_str::<Subdomain>("\"with space\"").is_err());
		assert!(serde_json::from_str::<ClientId>("\"\"").is_err());
	}
}

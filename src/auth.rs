//! Auth-domain identifiers, secrets, scope sets, grant types, and client credentials.

pub mod credentials;
pub mod grant;
pub mod id;
pub mod scope;
pub mod secret;

pub use credentials::*;
pub use grant::*;
pub use id::*;
pub use scope::*;
pub use secret::*;

//! JWT issuance for tests and mocks.
//!
//! [`TokenBuilder`] assembles header and claims, produces the compact signing input, and asks an
//! injected [`SignatureCalculator`] for the raw signature. The crate ships
//! [`RsaSignatureCalculator`] for RS256; tests swap in closures to observe or fail signing.

pub mod algorithm;
pub mod builder;
pub mod calculator;
pub mod claims;

pub use algorithm::*;
pub use builder::*;
pub use calculator::*;

//! Identity service configuration (data) and endpoint resolution (behavior).
//!
//! `configuration` exposes the immutable [`ServiceConfiguration`] record read by flows and the
//! HTTP token service, `builder` assembles it property by property, and `endpoints` defines the
//! [`EndpointsProvider`] port that flows consult for the token endpoint they hand to the token
//! service.

/// Builder API for assembling service configurations.
pub mod builder;
/// Immutable service configuration records.
pub mod configuration;
/// Endpoint resolution derived from a service configuration.
pub mod endpoints;
/// Identity service kinds and well-known property names.
pub mod service;

pub use builder::*;
pub use configuration::*;
pub use endpoints::*;
pub use service::*;

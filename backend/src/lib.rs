//! Sign-up service backend.
//!
//! Registers accounts and opens their first session. The crate is laid out
//! hexagonally: [`domain`] holds the model, service and ports; [`inbound`]
//! exposes them over HTTP; [`outbound`] implements the ports with PostgreSQL
//! and Argon2id.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

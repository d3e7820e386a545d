//! User profiles with email authentication plus the hello demonstration API.
//!
//! Layout follows ports and adapters: [`domain`] owns the types and the
//! [`UserProfileManager`](domain::UserProfileManager) service, [`inbound`]
//! adapts HTTP onto it and [`outbound`] supplies repositories and hashing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

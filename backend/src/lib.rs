//! Customer service library modules.
//!
//! Requests enter through the actix handlers in [`inbound::http`], travel
//! through the [`domain::Mediator`] pipeline (validation first, then the
//! registered handler) and reach storage via the ports in
//! [`domain::ports`], implemented by the adapters in [`outbound`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;

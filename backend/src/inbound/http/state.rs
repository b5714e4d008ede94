//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the mediator and remain testable without I/O.

use std::sync::Arc;

use crate::domain::Mediator;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub mediator: Arc<Mediator>,
}

impl HttpState {
    /// Wrap the mediator serving customer requests.
    pub fn new(mediator: Arc<Mediator>) -> Self {
        Self { mediator }
    }
}

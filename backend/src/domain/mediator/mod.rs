//! Request dispatcher routing each message to its single handler.
//!
//! A [`Mediator`] is assembled once at start-up through [`MediatorBuilder`].
//! Every dispatch travels through the registered [`PipelineStage`]s in
//! registration order before reaching the handler for the request's
//! [`RequestKind`]. Handler lookup is a plain map keyed by kind; `build`
//! refuses a registry where any kind has no handler or more than one.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde_json::json;
use thiserror::Error as ThisError;
use tokio_util::sync::CancellationToken;

use crate::domain::Error;
use crate::domain::requests::{Message, Reply, Request, RequestKind};
use crate::domain::validation::Violation;

mod pipeline;

pub use pipeline::{Next, PipelineStage, TracingStage, ValidationStage};

/// Future returned by a type-erased handler.
pub type HandlerFuture = BoxFuture<'static, Result<Reply, Error>>;

/// Type-erased handler stored in the routing table.
pub type HandlerFn = Arc<dyn Fn(Request) -> HandlerFuture + Send + Sync>;

/// Handles one request type.
#[async_trait]
pub trait RequestHandler<M: Message>: Send + Sync + 'static {
    /// Execute `message`.
    async fn handle(&self, message: M) -> Result<M::Output, Error>;
}

/// Failures surfaced by [`Mediator::send`] and [`Mediator::dispatch`].
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum DispatchError {
    /// At least one validator rejected the request; the handler did not run.
    #[error("request failed validation with {} violation(s)", .violations.len())]
    ValidationFailed {
        /// Every violation, in validator registration order.
        violations: Vec<Violation>,
    },
    /// The handler ran and returned an error.
    #[error("handler failed: {cause}")]
    HandlerFailed {
        /// Error returned by the handler.
        #[source]
        cause: Error,
    },
    /// Cancellation was observed before or during dispatch.
    #[error("dispatch was cancelled")]
    Cancelled,
    /// The handler answered with a reply of another request's shape.
    #[error("handler for {kind} produced a reply of the wrong shape")]
    UnexpectedReply {
        /// Kind of the request that was dispatched.
        kind: RequestKind,
    },
}

impl From<DispatchError> for Error {
    fn from(value: DispatchError) -> Self {
        match value {
            DispatchError::ValidationFailed { violations } => {
                Error::invalid_request("request failed validation")
                    .with_details(json!({ "violations": violations }))
            }
            DispatchError::HandlerFailed { cause } => cause,
            DispatchError::Cancelled => Error::service_unavailable("request was cancelled"),
            DispatchError::UnexpectedReply { kind } => {
                Error::internal(format!("handler for {kind} produced a reply of the wrong shape"))
            }
        }
    }
}

/// Misconfigured handler registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum RegistryError {
    /// No handler was registered for `kind`.
    #[error("no handler registered for {kind}")]
    MissingHandler {
        /// Kind left without a handler.
        kind: RequestKind,
    },
    /// More than one handler was registered for `kind`.
    #[error("more than one handler registered for {kind}")]
    DuplicateHandler {
        /// Kind registered twice.
        kind: RequestKind,
    },
}

/// Collects handlers and pipeline stages for a [`Mediator`].
#[derive(Default)]
pub struct MediatorBuilder {
    handlers: HashMap<RequestKind, HandlerFn>,
    duplicates: Vec<RequestKind>,
    stages: Vec<Arc<dyn PipelineStage>>,
}

impl MediatorBuilder {
    /// Empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for messages of type `M`.
    #[must_use]
    pub fn handler<M, H>(self, handler: H) -> Self
    where
        M: Message,
        H: RequestHandler<M>,
    {
        let handler = Arc::new(handler);
        let erased: HandlerFn = Arc::new(move |request: Request| -> HandlerFuture {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                let kind = request.kind();
                let message = M::from_request(request).ok_or_else(|| {
                    Error::internal(format!("{kind} was routed to the handler for {}", M::KIND))
                })?;
                let output = handler.handle(message).await?;
                Ok::<Reply, Error>(M::into_reply(output))
            })
        });
        self.handler_fn(M::KIND, erased)
    }

    /// Register an already type-erased handler for `kind`.
    #[must_use]
    pub fn handler_fn(mut self, kind: RequestKind, handler: HandlerFn) -> Self {
        if self.handlers.insert(kind, handler).is_some() {
            self.duplicates.push(kind);
        }
        self
    }

    /// Append a pipeline stage. Stages run in the order they are added.
    #[must_use]
    pub fn stage(mut self, stage: impl PipelineStage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Check the registry and produce the mediator.
    pub fn build(self) -> Result<Mediator, RegistryError> {
        if let Some(&kind) = self.duplicates.first() {
            return Err(RegistryError::DuplicateHandler { kind });
        }
        if let Some(kind) = RequestKind::ALL
            .into_iter()
            .find(|kind| !self.handlers.contains_key(kind))
        {
            return Err(RegistryError::MissingHandler { kind });
        }
        Ok(Mediator {
            handlers: self.handlers,
            stages: self.stages,
        })
    }
}

/// Routes requests through the pipeline to their handler.
#[derive(Clone)]
pub struct Mediator {
    handlers: HashMap<RequestKind, HandlerFn>,
    stages: Vec<Arc<dyn PipelineStage>>,
}

impl Mediator {
    /// Start assembling a mediator.
    #[must_use]
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::new()
    }

    /// Dispatch a typed message and recover its typed output.
    pub async fn send<M: Message>(
        &self,
        message: M,
        cancel: &CancellationToken,
    ) -> Result<M::Output, DispatchError> {
        let reply = self.dispatch(message.into_request(), cancel).await?;
        M::from_reply(reply).ok_or(DispatchError::UnexpectedReply { kind: M::KIND })
    }

    /// Dispatch a type-erased request.
    pub async fn dispatch(
        &self,
        request: Request,
        cancel: &CancellationToken,
    ) -> Result<Reply, DispatchError> {
        let kind = request.kind();
        let Some(handler) = self.handlers.get(&kind) else {
            return Err(DispatchError::HandlerFailed {
                cause: Error::internal(format!("no handler registered for {kind}")),
            });
        };
        Next::new(&self.stages, handler, cancel).run(request).await
    }
}

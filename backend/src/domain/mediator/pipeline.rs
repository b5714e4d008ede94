//! Pipeline stages wrapped around every dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{DispatchError, HandlerFn};
use crate::domain::requests::{Message, Reply, Request, RequestKind};
use crate::domain::validation::{Validator, Violation};

/// Behaviour wrapped around the handler.
///
/// A stage either forwards the request by awaiting [`Next::run`] or answers
/// on its own without reaching the handler.
#[async_trait]
pub trait PipelineStage: Send + Sync {
    /// Process `request`, optionally delegating to `next`.
    async fn handle(&self, request: Request, next: Next<'_>) -> Result<Reply, DispatchError>;
}

/// Remainder of the pipeline after the current stage.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    stages: &'a [Arc<dyn PipelineStage>],
    handler: &'a HandlerFn,
    cancel: &'a CancellationToken,
}

impl<'a> Next<'a> {
    pub(super) fn new(
        stages: &'a [Arc<dyn PipelineStage>],
        handler: &'a HandlerFn,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            stages,
            handler,
            cancel,
        }
    }

    /// Token cancelling the current dispatch.
    #[must_use]
    pub fn cancellation(&self) -> &'a CancellationToken {
        self.cancel
    }

    /// Run the remaining stages and then the handler.
    ///
    /// The token is checked before each step. The handler future is raced
    /// against cancellation and dropped as soon as the token fires.
    pub fn run(self, request: Request) -> BoxFuture<'a, Result<Reply, DispatchError>> {
        Box::pin(async move {
            if self.cancel.is_cancelled() {
                return Err(DispatchError::Cancelled);
            }
            match self.stages.split_first() {
                Some((stage, rest)) => {
                    let next = Next::new(rest, self.handler, self.cancel);
                    stage.handle(request, next).await
                }
                None => {
                    tokio::select! {
                        biased;
                        () = self.cancel.cancelled() => Err(DispatchError::Cancelled),
                        result = (self.handler)(request) => {
                            result.map_err(|cause| DispatchError::HandlerFailed { cause })
                        }
                    }
                }
            }
        })
    }
}

type ValidateFn = Arc<dyn Fn(&Request) -> Vec<Violation> + Send + Sync>;

/// Runs every validator registered for the request kind before the handler.
///
/// Violations from all validators are concatenated in registration order. A
/// non-empty list fails the dispatch with [`DispatchError::ValidationFailed`]
/// and the rest of the pipeline is skipped. Kinds without validators pass.
#[derive(Clone, Default)]
pub struct ValidationStage {
    validators: HashMap<RequestKind, Vec<ValidateFn>>,
}

impl ValidationStage {
    /// Stage with no validators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `validator` for messages of type `M`.
    #[must_use]
    pub fn with_validator<M, V>(mut self, validator: V) -> Self
    where
        M: Message,
        V: Validator<M> + 'static,
    {
        let validator = Arc::new(validator);
        let check: ValidateFn = Arc::new(move |request: &Request| {
            M::view(request)
                .map(|message| validator.validate(message))
                .unwrap_or_default()
        });
        self.validators.entry(M::KIND).or_default().push(check);
        self
    }

    /// Number of validators registered for `kind`.
    #[must_use]
    pub fn validator_count(&self, kind: RequestKind) -> usize {
        self.validators.get(&kind).map_or(0, Vec::len)
    }

    /// Run the validators for `request` and collect their violations.
    #[must_use]
    pub fn validate(&self, request: &Request) -> Vec<Violation> {
        self.validators
            .get(&request.kind())
            .map(|checks| checks.iter().flat_map(|check| check(request)).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PipelineStage for ValidationStage {
    async fn handle(&self, request: Request, next: Next<'_>) -> Result<Reply, DispatchError> {
        let violations = self.validate(&request);
        if violations.is_empty() {
            return next.run(request).await;
        }
        debug!(
            kind = %request.kind(),
            violations = violations.len(),
            "request rejected by validation"
        );
        Err(DispatchError::ValidationFailed { violations })
    }
}

/// Logs the kind, outcome and duration of each dispatch.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingStage;

#[async_trait]
impl PipelineStage for TracingStage {
    async fn handle(&self, request: Request, next: Next<'_>) -> Result<Reply, DispatchError> {
        let kind = request.kind();
        let started = Instant::now();
        let result = next.run(request).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            Ok(_) => info!(kind = %kind, elapsed_ms, "request dispatched"),
            Err(DispatchError::ValidationFailed { violations }) => debug!(
                kind = %kind,
                elapsed_ms,
                violations = violations.len(),
                "request rejected by validation"
            ),
            Err(DispatchError::Cancelled) => {
                info!(kind = %kind, elapsed_ms, "request cancelled");
            }
            Err(error) => warn!(kind = %kind, elapsed_ms, error = %error, "request failed"),
        }
        result
    }
}

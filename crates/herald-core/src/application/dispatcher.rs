//! Request dispatcher
//!
//! Routes each request to the single handler registered for its kind and
//! runs the fixed pipeline around it:
//!
//! 1. structural validation
//! 2. handler execution
//! 3. post-commit side effects of a successful outcome
//!
//! The registry is immutable once built, so a [`Dispatcher`] is cheap to
//! clone and share across tasks.

use crate::application::handlers::{ErasedHandler, Handler, TypedHandler};
use crate::application::requests::{Request, RequestKind, RequestMessage, Response};
use crate::application::side_effects::SideEffectRunner;
use crate::application::validation::{Validate, ValidationErrors};
use crate::application::{ApplicationError, RequestContext};
use crate::config::{ConfigError, PipelineConfig};
use crate::telemetry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, debug, info, info_span};

/// Dispatch Result type
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Failure of one dispatch
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The request was rejected before any handler ran
    #[error("Validation failed: {0}")]
    ValidationFailed(ValidationErrors),

    #[error(transparent)]
    Execution(#[from] ApplicationError),
}

impl DispatchError {
    /// Validation failures, if this is one
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Self::ValidationFailed(errors) => Some(errors),
            Self::Execution(_) => None,
        }
    }

    /// Execution failure, if this is one
    pub fn execution(&self) -> Option<&ApplicationError> {
        match self {
            Self::ValidationFailed(_) => None,
            Self::Execution(err) => Some(err),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ValidationFailed(_) => "invalid",
            Self::Execution(err) => err.label(),
        }
    }
}

/// Startup wiring errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("No handler registered for request kind {0}")]
    Unregistered(RequestKind),

    #[error("More than one handler registered for request kind {0}")]
    Duplicate(RequestKind),

    #[error("Invalid pipeline configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Collects handlers and configuration, then freezes them into a
/// [`Dispatcher`]
pub struct DispatcherBuilder {
    handlers: HashMap<RequestKind, Arc<dyn ErasedHandler>>,
    duplicates: Vec<RequestKind>,
    config: PipelineConfig,
    runner: Option<SideEffectRunner>,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            duplicates: Vec::new(),
            config: PipelineConfig::default(),
            runner: None,
        }
    }

    /// Register the handler for `H::Request`
    pub fn register<H: Handler>(mut self, handler: H) -> Self {
        let kind = <H::Request as RequestMessage>::KIND;
        let erased: Arc<dyn ErasedHandler> = Arc::new(TypedHandler(handler));
        if self.handlers.insert(kind, erased).is_some() {
            self.duplicates.push(kind);
        }
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a prepared runner, e.g. one created with
    /// [`SideEffectRunner::with_reports`]; takes precedence over the
    /// notification settings of the config
    pub fn with_side_effect_runner(mut self, runner: SideEffectRunner) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Build a dispatcher that handles every [`RequestKind`]
    pub fn build(self) -> Result<Dispatcher, RegistrationError> {
        if let Some(kind) = RequestKind::ALL
            .iter()
            .find(|kind| !self.handlers.contains_key(*kind))
        {
            return Err(RegistrationError::Unregistered(*kind));
        }
        self.build_partial()
    }

    /// Build a dispatcher that may lack handlers for some kinds
    pub fn build_partial(self) -> Result<Dispatcher, RegistrationError> {
        if let Some(kind) = self.duplicates.first() {
            return Err(RegistrationError::Duplicate(*kind));
        }
        self.config.validate()?;

        let runner = self
            .runner
            .unwrap_or_else(|| SideEffectRunner::new(&self.config.notifications));

        Ok(Dispatcher {
            inner: Arc::new(DispatcherInner {
                handlers: self.handlers,
                runner,
            }),
        })
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct DispatcherInner {
    handlers: HashMap<RequestKind, Arc<dyn ErasedHandler>>,
    runner: SideEffectRunner,
}

/// Entry point for every request
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl Dispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Kinds with a registered handler, in [`RequestKind::ALL`] order
    pub fn registered_kinds(&self) -> Vec<RequestKind> {
        RequestKind::ALL
            .into_iter()
            .filter(|kind| self.inner.handlers.contains_key(kind))
            .collect()
    }

    /// Run the pipeline for an enveloped request
    pub async fn dispatch(&self, request: Request, ctx: RequestContext) -> DispatchResult<Response> {
        let kind = request.kind();
        let span = info_span!("dispatch", kind = %kind, request_id = %ctx.request_id());
        self.dispatch_timed(kind, request, ctx).instrument(span).await
    }

    /// Dispatch a concrete request with a fresh context
    pub async fn execute<R: RequestMessage>(&self, request: R) -> DispatchResult<R::Response> {
        self.execute_with(request, RequestContext::new()).await
    }

    /// Dispatch a concrete request with the given context
    pub async fn execute_with<R: RequestMessage>(
        &self,
        request: R,
        ctx: RequestContext,
    ) -> DispatchResult<R::Response> {
        let response = self.dispatch(request.into_request(), ctx).await?;
        R::unwrap_response(response)
            .map_err(|_| DispatchError::Execution(ApplicationError::ResponseMismatch(R::KIND)))
    }

    async fn dispatch_timed(
        &self,
        kind: RequestKind,
        request: Request,
        ctx: RequestContext,
    ) -> DispatchResult<Response> {
        let started = Instant::now();
        let result = self.run_pipeline(kind, request, &ctx).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => {
                telemetry::record_dispatch(kind, "ok");
                info!(elapsed_ms, "dispatch completed");
            }
            Err(err) => {
                telemetry::record_dispatch(kind, err.label());
                info!(elapsed_ms, outcome = err.label(), error = %err, "dispatch failed");
            }
        }

        result
    }

    async fn run_pipeline(
        &self,
        kind: RequestKind,
        request: Request,
        ctx: &RequestContext,
    ) -> DispatchResult<Response> {
        let handler = self
            .inner
            .handlers
            .get(&kind)
            .ok_or(ApplicationError::UnregisteredRequestType(kind))?;

        request
            .validate()
            .into_result()
            .map_err(DispatchError::ValidationFailed)?;
        debug!("request validated");

        if ctx.is_cancelled() {
            return Err(ApplicationError::Cancelled.into());
        }

        let outcome = handler.handle_request(request, ctx).await?;
        debug!(side_effects = outcome.post_commit.len(), "handler succeeded");

        self.inner
            .runner
            .run(kind, outcome.post_commit, ctx.cancellation())
            .await;

        Ok(outcome.response)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("kinds", &self.registered_kinds())
            .field("mode", &self.inner.runner.mode())
            .finish()
    }
}

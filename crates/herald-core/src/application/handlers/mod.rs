//! Request handlers
//!
//! Exactly one handler per [`RequestKind`](crate::application::RequestKind). A handler orchestrates domain
//! operations through the ports it was constructed with and returns a
//! response plus the side effects to run after it succeeded.

pub mod event_handlers;
pub mod review_handlers;

pub use event_handlers::{CreateEventHandler, GetEventHandler, GetEventsListHandler};
pub use review_handlers::{CreateReviewHandler, GetEventReviewsHandler};

use crate::application::requests::{Request, RequestMessage, Response};
use crate::application::side_effects::PostCommit;
use crate::application::{ApplicationError, ApplicationResult, RequestContext};
use async_trait::async_trait;

/// Result of a handler for request type `R`
pub type HandlerResult<R> = ApplicationResult<HandlerOutcome<<R as RequestMessage>::Response>>;

/// Successful handler result
#[derive(Debug)]
pub struct HandlerOutcome<T> {
    pub response: T,
    /// Runs only because the handler succeeded
    pub post_commit: PostCommit,
}

impl<T> HandlerOutcome<T> {
    /// Response without side effects
    pub fn respond(response: T) -> Self {
        Self {
            response,
            post_commit: PostCommit::new(),
        }
    }

    pub fn with_post_commit(mut self, post_commit: PostCommit) -> Self {
        self.post_commit = post_commit;
        self
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> HandlerOutcome<U> {
        HandlerOutcome {
            response: f(self.response),
            post_commit: self.post_commit,
        }
    }
}

/// Use case for one request type
///
/// Handlers receive requests that already passed validation.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    type Request: RequestMessage;

    async fn handle(
        &self,
        request: Self::Request,
        ctx: &RequestContext,
    ) -> HandlerResult<Self::Request>;
}

/// Object-safe view of a [`Handler`] stored in the dispatcher registry
#[async_trait]
pub(crate) trait ErasedHandler: Send + Sync {
    async fn handle_request(
        &self,
        request: Request,
        ctx: &RequestContext,
    ) -> ApplicationResult<HandlerOutcome<Response>>;
}

pub(crate) struct TypedHandler<H>(pub(crate) H);

#[async_trait]
impl<H: Handler> ErasedHandler for TypedHandler<H> {
    async fn handle_request(
        &self,
        request: Request,
        ctx: &RequestContext,
    ) -> ApplicationResult<HandlerOutcome<Response>> {
        let typed = <H::Request as RequestMessage>::from_request(request)
            .map_err(|other| ApplicationError::UnregisteredRequestType(other.kind()))?;
        let outcome = self.0.handle(typed, ctx).await?;
        Ok(outcome.map(<H::Request as RequestMessage>::wrap_response))
    }
}

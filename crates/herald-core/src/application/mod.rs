//! Application layer - Use cases and orchestration
//!
//! Implements CQRS with one handler per request kind. The dispatcher runs
//! the fixed pipeline (validate, handle, post-commit side effects) and the
//! handlers orchestrate the domain through ports.

pub mod commands;
pub mod context;
pub mod dispatcher;
pub mod handlers;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod side_effects;
pub mod validation;
pub mod wiring;

pub use commands::*;
pub use context::{CancellationHandle, CancellationSignal, RequestContext, cancellation_pair};
pub use dispatcher::{DispatchError, DispatchResult, Dispatcher, DispatcherBuilder, RegistrationError};
pub use handlers::{Handler, HandlerOutcome, HandlerResult};
pub use queries::*;
pub use requests::{Request, RequestKind, RequestMessage};
pub use responses::*;
pub use side_effects::{DeliveryReport, Notify, PostCommit, SideEffect, SideEffectRunner};
pub use validation::{FieldFailure, Validate, ValidationErrors, ValidationResult};
pub use wiring::Ports;

use herald_domain::DomainError;

/// Application Result type
pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Execution failures of a dispatched request
///
/// Input defects are not part of this enum; they are reported as
/// [`DispatchError::ValidationFailed`] before a handler runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplicationError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    ConflictViolation(String),

    /// The repository failed; the caller may retry
    #[error("Persistence failure: {0}")]
    PersistenceFailure(String),

    #[error("Domain rule violated: {0}")]
    DomainRule(String),

    #[error("Request cancelled")]
    Cancelled,

    /// Wiring defect: no handler for this kind
    #[error("No handler registered for request kind {0}")]
    UnregisteredRequestType(RequestKind),

    /// Wiring defect: the handler produced another kind's response
    #[error("Handler for {0} returned a mismatched response")]
    ResponseMismatch(RequestKind),
}

impl ApplicationError {
    /// Whether the same request may succeed if sent again unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PersistenceFailure(_))
    }

    /// Short label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::ConflictViolation(_) => "conflict",
            Self::PersistenceFailure(_) => "persistence_failure",
            Self::DomainRule(_) => "domain_rule",
            Self::Cancelled => "cancelled",
            Self::UnregisteredRequestType(_) => "unregistered",
            Self::ResponseMismatch(_) => "response_mismatch",
        }
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(msg) => Self::NotFound(msg),
            DomainError::ConflictViolation(msg) => Self::ConflictViolation(msg),
            DomainError::Persistence(msg) => Self::PersistenceFailure(msg),
            other => Self::DomainRule(other.to_string()),
        }
    }
}

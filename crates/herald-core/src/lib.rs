//! # Herald
//!
//! Request-handling pipeline for an events and reviews service.
//! Every command or query goes through one [`Dispatcher`]: it is validated,
//! handed to exactly one handler, executed against the repository ports,
//! and followed by best-effort notifications that can never change the
//! result the caller receives.

#![warn(rust_2018_idioms)]

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod telemetry;

// Domain layer exports
pub use domain::{
    Channel, Contact, DomainError, DomainResult, Entity, Event, EventId, Rating, Review, ReviewId,
    ports::{
        DeliveryReceipt, NotificationError, NotificationMessage, NotificationPort, Page,
        Pagination, Repository, SystemTimeProvider, TimeProvider,
    },
};

// Application layer exports
pub use application::{
    ApplicationError, ApplicationResult, DispatchError, DispatchResult, Dispatcher,
    DispatcherBuilder, Handler, HandlerOutcome, HandlerResult, Ports, PostCommit,
    RegistrationError, Request, RequestContext, RequestKind, RequestMessage, SideEffectRunner,
    Validate, ValidationErrors, ValidationResult, commands, queries, requests::Response,
    responses,
};

// Configuration exports
pub use config::{ConfigError, DeliveryMode, NotificationConfig, PipelineConfig, RetryPolicy};

// Infrastructure exports
pub use infrastructure::{InMemoryRepository, LogNotifier, OutboxNotifier};

/// Re-export commonly used types
pub mod prelude {
    pub use super::{
        ApplicationError, Channel, Contact, DispatchError, DispatchResult, Dispatcher,
        PipelineConfig, Ports, Request, RequestContext, RequestKind, RequestMessage, Response,
    };
    pub use crate::application::{
        CreateEventCommand, CreateReviewCommand, GetEventQuery, GetEventReviewsQuery,
        GetEventsListQuery,
    };
}

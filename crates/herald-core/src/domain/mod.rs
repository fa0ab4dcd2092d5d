//! Domain layer - model re-exports and ports
//!
//! The model itself lives in `herald-domain`; this module adds the ports
//! through which handlers reach persistence, notification channels and
//! the clock.

pub mod ports;

pub use herald_domain::{
    Channel, Contact, DomainError, DomainResult, Entity, Event, EventFilter, EventId, NewEvent,
    NewReview, Rating, Review, ReviewFilter, ReviewId,
};
pub use ports::{
    DeliveryReceipt, NotificationError, NotificationMessage, NotificationPort, Page, Pagination,
    Repository, SystemTimeProvider, TimeProvider,
};

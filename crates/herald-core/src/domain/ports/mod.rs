//! Ports - Domain interfaces for external dependencies
//!
//! Defines contracts that infrastructure adapters must implement.
//! Handlers depend on these traits only, never on a concrete adapter.

pub mod notification;
pub mod repository;

pub use notification::{DeliveryReceipt, NotificationError, NotificationMessage, NotificationPort};
pub use repository::{Page, Pagination, Repository};

/// Time provider port (for testability)
pub trait TimeProvider: Send + Sync {
    /// Get current timestamp
    fn now(&self) -> chrono::DateTime<chrono::Utc>;
}

/// Default implementation using system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now()
    }
}

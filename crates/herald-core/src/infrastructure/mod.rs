//! Infrastructure layer - Adapters for the domain ports
//!
//! In-memory implementations used by tests, the demo binary and
//! embedders that do not need durable storage.

pub mod adapters;

pub use adapters::{InMemoryRepository, LogNotifier, OutboxNotifier};

//! Infrastructure adapters implementing domain ports

pub mod memory_repository;
pub mod notifiers;

pub use memory_repository::InMemoryRepository;
pub use notifiers::{LogNotifier, OutboxNotifier};

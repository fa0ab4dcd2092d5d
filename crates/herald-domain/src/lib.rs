//! Herald Domain Layer - Entities and Value Objects
//!
//! This crate contains the domain model the herald pipeline operates on:
//! events that people can attend and reviews they leave afterwards.
//! It has no knowledge of repositories, notification channels or the
//! dispatcher; those live in the `herald` crate and talk to this one
//! through plain values.
//!
//! ## Architecture
//!
//! - **Value Objects**: Immutable, validated concepts (`Rating`, `Contact`, typed ids)
//! - **Entities**: Objects with identity (`Event`, `Review`) implementing [`Entity`]

#![warn(missing_docs)]

pub mod entities;
pub mod value_objects;

pub use entities::{Entity, Event, EventFilter, NewEvent, NewReview, Review, ReviewFilter};
pub use value_objects::{Channel, Contact, EventId, Id, IdMarker, Rating, ReviewId};

/// Domain Result type
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-specific errors
///
/// Repository ports report their failures with these variants so the
/// application layer can classify them without knowing the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DomainError {
    /// Entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A state-dependent invariant such as uniqueness was violated
    #[error("Conflict: {0}")]
    ConflictViolation(String),

    /// The backing store failed
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// A value object rejected its input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Entity invariant violation
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    /// Create a not-found error for an entity kind and id
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{entity} {id}"))
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::ConflictViolation(message.into())
    }

    /// Create a persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_creation() {
        let err = DomainError::not_found("Event", 42);
        assert_eq!(err, DomainError::NotFound("Event 42".to_string()));
        assert_eq!(err.to_string(), "Not found: Event 42");

        let err = DomainError::conflict("duplicate");
        assert!(matches!(err, DomainError::ConflictViolation(_)));

        let err = DomainError::persistence("disk full");
        assert!(matches!(err, DomainError::Persistence(_)));
    }

    #[test]
    fn test_domain_result() {
        let result: DomainResult<u32> = Ok(42);
        assert!(result.is_ok());

        let result: DomainResult<u32> = Err(DomainError::InvalidInput("test".to_string()));
        assert!(result.is_err());
    }
}

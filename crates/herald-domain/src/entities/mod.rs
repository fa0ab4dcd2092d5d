//! Domain entities
//!
//! Entities have identity and are owned by a repository. The [`Entity`]
//! trait carries the little a generic store needs to know about them:
//! identity, an optional uniqueness key, a typed filter and an ordering.

mod event;
mod review;

pub use event::{Event, EventFilter, NewEvent};
pub use review::{NewReview, Review, ReviewFilter};

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Persistable domain object
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Identity type
    type Id: Copy + Eq + Hash + Display + Debug + Send + Sync + 'static;

    /// Typed list filter understood by repositories
    type Filter: Clone + Debug + Default + Send + Sync;

    /// Ordering used when listing
    type SortKey: Ord;

    /// Entity name used in error messages
    const NAME: &'static str;

    /// Identity of this entity
    fn id(&self) -> Self::Id;

    /// Key that must be unique across all stored entities of this type
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Whether the entity passes the filter
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Listing order
    fn sort_key(&self) -> Self::SortKey;
}

//! Repository port for entity persistence
//!
//! One generic contract covers every entity type. Each write is atomic
//! from the caller's point of view; transactions are not exposed.

use async_trait::async_trait;
use herald_domain::{DomainResult, Entity};
use serde::{Deserialize, Serialize};

/// Repository for a single entity type
///
/// Failures are reported as [`NotFound`](herald_domain::DomainError::NotFound),
/// [`ConflictViolation`](herald_domain::DomainError::ConflictViolation)
/// (uniqueness) or [`Persistence`](herald_domain::DomainError::Persistence)
/// (the store itself failed).
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Persist a new entity and return the stored value
    async fn add(&self, entity: E) -> DomainResult<E>;

    /// Load an entity by id
    async fn get_by_id(&self, id: E::Id) -> DomainResult<E>;

    /// List entities matching the filter, in the entity's sort order
    async fn list(&self, filter: E::Filter, pagination: Pagination) -> DomainResult<Page<E>>;
}

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

impl Pagination {
    /// Default page size
    pub const DEFAULT_LIMIT: usize = 50;

    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Everything from the first item on
    pub fn all() -> Self {
        Self {
            offset: 0,
            limit: usize::MAX,
        }
    }

    /// Cut one page out of an already ordered list
    pub fn apply<T>(&self, items: Vec<T>) -> Page<T> {
        let total_count = items.len();
        let items: Vec<T> = items
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect();
        let has_more = self.offset.saturating_add(items.len()) < total_count;

        Page {
            items,
            total_count,
            has_more,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub has_more: bool,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            has_more: self.has_more,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_default() {
        let pagination = Pagination::default();
        assert_eq!(pagination.offset, 0);
        assert_eq!(pagination.limit, 50);
    }

    #[test]
    fn test_apply_middle_page() {
        let page = Pagination::new(2, 3).apply((0..10).collect::<Vec<_>>());
        assert_eq!(page.items, vec![2, 3, 4]);
        assert_eq!(page.total_count, 10);
        assert!(page.has_more);
    }

    #[test]
    fn test_apply_last_page() {
        let page = Pagination::new(8, 5).apply((0..10).collect::<Vec<_>>());
        assert_eq!(page.items, vec![8, 9]);
        assert!(!page.has_more);
    }

    #[test]
    fn test_apply_offset_past_end() {
        let page = Pagination::new(20, 5).apply((0..10).collect::<Vec<_>>());
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 10);
        assert!(!page.has_more);
    }

    #[test]
    fn test_all_does_not_overflow() {
        let page = Pagination::all().apply(vec!["a", "b"]);
        assert_eq!(page.items.len(), 2);
        assert!(!page.has_more);
    }

    #[test]
    fn test_page_map() {
        let page = Pagination::default().apply(vec![1, 2]).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
    }
}

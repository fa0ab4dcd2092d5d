//! Queries - Read operations that don't change state

use crate::application::validation::{Validate, ValidationResult};
use crate::domain::ports::Pagination;
use herald_domain::EventId;
use serde::{Deserialize, Serialize};

const MAX_PAGE_SIZE: usize = 100;

/// List events, optionally only those that have not started yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetEventsListQuery {
    pub upcoming_only: bool,
    pub offset: usize,
    pub limit: usize,
}

impl GetEventsListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.offset, self.limit)
    }
}

impl Default for GetEventsListQuery {
    fn default() -> Self {
        Self {
            upcoming_only: false,
            offset: 0,
            limit: Pagination::DEFAULT_LIMIT,
        }
    }
}

impl Validate for GetEventsListQuery {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.check(
            "limit",
            (1..=MAX_PAGE_SIZE).contains(&self.limit),
            "limit must be between 1 and 100",
        );
        result
    }
}

/// Fetch one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetEventQuery {
    pub event_id: EventId,
}

impl Validate for GetEventQuery {
    fn validate(&self) -> ValidationResult {
        ValidationResult::new()
    }
}

/// All reviews of one event with their average rating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetEventReviewsQuery {
    pub event_id: EventId,
}

impl Validate for GetEventReviewsQuery {
    fn validate(&self) -> ValidationResult {
        ValidationResult::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_list_query_is_valid() {
        let query = GetEventsListQuery::default();
        assert!(query.validate().is_valid());
        assert_eq!(query.pagination(), Pagination::default());
    }

    #[test]
    fn test_list_limit_bounds() {
        for limit in [0, 101] {
            let query = GetEventsListQuery {
                limit,
                ..GetEventsListQuery::default()
            };
            assert_eq!(
                query.validate().messages(),
                vec!["limit must be between 1 and 100"]
            );
        }
    }

    #[test]
    fn test_list_query_deserializes_from_empty_object() {
        let query: GetEventsListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query, GetEventsListQuery::default());
    }
}

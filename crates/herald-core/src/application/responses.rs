//! Response shapes returned to callers
//!
//! Plain data projections of entities; callers never receive the
//! entities themselves.

use chrono::{DateTime, Utc};
use herald_domain::{Event, EventId, Review, ReviewId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCreated {
    pub event_id: EventId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCreated {
    pub review_id: ReviewId,
}

/// List item for an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: EventId,
    pub title: String,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id(),
            title: event.title().to_string(),
            venue: event.venue().to_string(),
            starts_at: event.starts_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsList {
    pub events: Vec<EventSummary>,
    pub total_count: usize,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDetails {
    pub id: EventId,
    pub title: String,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    pub capacity: u32,
    pub organizer_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Event> for EventDetails {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id(),
            title: event.title().to_string(),
            venue: event.venue().to_string(),
            starts_at: event.starts_at(),
            capacity: event.capacity(),
            organizer_name: event.organizer().name.clone(),
            created_at: event.created_at(),
        }
    }
}

/// Public view of a review; contact addresses are not exposed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewView {
    pub id: ReviewId,
    pub reviewer_name: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id(),
            reviewer_name: review.reviewer().name.clone(),
            rating: review.rating().value(),
            comment: review.comment().to_string(),
            created_at: review.created_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventReviews {
    pub event_id: EventId,
    pub reviews: Vec<ReviewView>,
    /// `None` when there are no reviews yet
    pub average_rating: Option<f64>,
}

impl EventReviews {
    pub fn new(event_id: EventId, reviews: Vec<ReviewView>) -> Self {
        let average_rating = if reviews.is_empty() {
            None
        } else {
            let sum: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
            Some(f64::from(sum) / reviews.len() as f64)
        };

        Self {
            event_id,
            reviews,
            average_rating,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(rating: u8) -> ReviewView {
        ReviewView {
            id: ReviewId::new(),
            reviewer_name: "Bo".to_string(),
            rating,
            comment: "ok".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_average_rating() {
        let reviews = EventReviews::new(EventId::new(), vec![view(5), view(4), view(3)]);
        assert_eq!(reviews.average_rating, Some(4.0));
    }

    #[test]
    fn test_average_rating_empty() {
        let reviews = EventReviews::new(EventId::new(), Vec::new());
        assert_eq!(reviews.average_rating, None);
    }
}

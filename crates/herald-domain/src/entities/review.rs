//! Review entity

use crate::{
    DomainResult,
    entities::Entity,
    value_objects::{Contact, EventId, Rating, ReviewId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attributes of a review before it has an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReview {
    /// Reviewed event
    pub event_id: EventId,
    /// Who wrote it
    pub reviewer: Contact,
    /// Raw star rating
    pub rating: u8,
    /// Free text
    pub comment: String,
}

/// A rating and comment left for an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    id: ReviewId,
    event_id: EventId,
    reviewer: Contact,
    rating: Rating,
    comment: String,
    created_at: DateTime<Utc>,
}

impl Review {
    /// Create a review from its attributes
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the rating is out of range.
    pub fn create(id: ReviewId, new: NewReview, created_at: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id,
            event_id: new.event_id,
            reviewer: new.reviewer,
            rating: Rating::new(new.rating)?,
            comment: new.comment.trim().to_string(),
            created_at,
        })
    }

    /// Review identifier
    pub fn id(&self) -> ReviewId {
        self.id
    }

    /// Reviewed event
    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    /// Reviewer contact
    pub fn reviewer(&self) -> &Contact {
        &self.reviewer
    }

    /// Rating
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Comment text
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Creation time
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn reviewer_key(&self) -> String {
        self.reviewer
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .unwrap_or(self.reviewer.name.trim())
            .to_lowercase()
    }
}

/// Filter for listing reviews
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    /// Only reviews of this event
    pub event_id: Option<EventId>,
}

impl Entity for Review {
    type Id = ReviewId;
    type Filter = ReviewFilter;
    type SortKey = (DateTime<Utc>, uuid::Uuid);

    const NAME: &'static str = "Review";

    fn id(&self) -> ReviewId {
        self.id
    }

    /// One review per reviewer and event
    fn unique_key(&self) -> Option<String> {
        Some(format!("{}:{}", self.event_id, self.reviewer_key()))
    }

    fn matches(&self, filter: &ReviewFilter) -> bool {
        filter.event_id.is_none_or(|event_id| self.event_id == event_id)
    }

    fn sort_key(&self) -> Self::SortKey {
        (self.created_at, self.id.as_uuid())
    }
}

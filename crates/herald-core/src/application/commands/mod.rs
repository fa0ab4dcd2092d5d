//! Commands - Write operations that change system state

use crate::application::validation::{Validate, ValidationResult, looks_like_email, present};
use chrono::{DateTime, Utc};
use herald_domain::{Contact, EventId, Rating};
use serde::{Deserialize, Serialize};

const MAX_TITLE_CHARS: usize = 200;
const MAX_COMMENT_CHARS: usize = 2_000;

/// Publish a new event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEventCommand {
    pub title: String,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    pub capacity: u32,
    pub organizer: Contact,
}

impl Validate for CreateEventCommand {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        result
            .check("title", present(&self.title), "title required")
            .check(
                "title",
                self.title.trim().chars().count() <= MAX_TITLE_CHARS,
                "title too long",
            )
            .check("venue", present(&self.venue), "venue required")
            .check("capacity", self.capacity >= 1, "capacity must be at least 1")
            .check(
                "organizer",
                self.organizer.is_reachable(),
                "organizer contact required",
            );

        if let Some(email) = self.organizer.email.as_deref()
            && present(email)
        {
            result.check(
                "organizer.email",
                looks_like_email(email),
                "organizer email is invalid",
            );
        }

        result
    }
}

/// Leave a review for an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateReviewCommand {
    pub event_id: EventId,
    pub reviewer: Contact,
    pub rating: u8,
    pub comment: String,
}

impl Validate for CreateReviewCommand {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        result
            .check("rating", Rating::is_valid(self.rating), "rating out of range")
            .check("comment", present(&self.comment), "comment required")
            .check(
                "comment",
                self.comment.trim().chars().count() <= MAX_COMMENT_CHARS,
                "comment too long",
            )
            .check(
                "reviewer.name",
                present(&self.reviewer.name),
                "reviewer name required",
            );
        result
    }
}

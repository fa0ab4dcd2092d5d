//! Event entity

use crate::{
    DomainError, DomainResult,
    entities::Entity,
    value_objects::{Contact, EventId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attributes of an event before it has an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Title shown in listings
    pub title: String,
    /// Where it takes place
    pub venue: String,
    /// Start time
    pub starts_at: DateTime<Utc>,
    /// Number of attendees it can hold
    pub capacity: u32,
    /// Who runs it
    pub organizer: Contact,
}

/// Something people attend and later review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    title: String,
    venue: String,
    starts_at: DateTime<Utc>,
    capacity: u32,
    organizer: Contact,
    created_at: DateTime<Utc>,
}

impl Event {
    /// Create an event from its attributes
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` when the title is blank or the capacity is zero.
    pub fn create(id: EventId, new: NewEvent, created_at: DateTime<Utc>) -> DomainResult<Self> {
        let title = new.title.trim().to_string();
        if title.is_empty() {
            return Err(DomainError::InvariantViolation(
                "event title must not be blank".to_string(),
            ));
        }
        if new.capacity == 0 {
            return Err(DomainError::InvariantViolation(
                "event capacity must be positive".to_string(),
            ));
        }

        Ok(Self {
            id,
            title,
            venue: new.venue.trim().to_string(),
            starts_at: new.starts_at,
            capacity: new.capacity,
            organizer: new.organizer,
            created_at,
        })
    }

    /// Event identifier
    pub fn id(&self) -> EventId {
        self.id
    }

    /// Event title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Venue
    pub fn venue(&self) -> &str {
        &self.venue
    }

    /// Start time
    pub fn starts_at(&self) -> DateTime<Utc> {
        self.starts_at
    }

    /// Capacity
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Organizer contact
    pub fn organizer(&self) -> &Contact {
        &self.organizer
    }

    /// Creation time
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the event starts after `now`
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.starts_at > now
    }
}

/// Filter for listing events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    /// Only events starting after this instant
    pub starts_after: Option<DateTime<Utc>>,
}

impl Entity for Event {
    type Id = EventId;
    type Filter = EventFilter;
    type SortKey = (DateTime<Utc>, uuid::Uuid);

    const NAME: &'static str = "Event";

    fn id(&self) -> EventId {
        self.id
    }

    fn matches(&self, filter: &EventFilter) -> bool {
        filter
            .starts_after
            .is_none_or(|after| self.is_upcoming(after))
    }

    fn sort_key(&self) -> Self::SortKey {
        (self.starts_at, self.id.as_uuid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn new_event(title: &str, capacity: u32) -> NewEvent {
        NewEvent {
            title: title.to_string(),
            venue: "Hall A".to_string(),
            starts_at: Utc.with_ymd_and_hms(2030, 5, 1, 18, 0, 0).unwrap(),
            capacity,
            organizer: Contact::new("Org").with_email("org@example.com"),
        }
    }

    #[test]
    fn test_create_trims_title() {
        let event = Event::create(EventId::new(), new_event("  RustConf  ", 100), Utc::now()).unwrap();
        assert_eq!(event.title(), "RustConf");
        assert_eq!(event.capacity(), 100);
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let result = Event::create(EventId::new(), new_event(" ", 10), Utc::now());
        assert!(matches!(result, Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn test_create_rejects_zero_capacity() {
        let result = Event::create(EventId::new(), new_event("Meetup", 0), Utc::now());
        assert!(matches!(result, Err(DomainError::InvariantViolation(_))));
    }

    #[test]
    fn test_filter_upcoming() {
        let event = Event::create(EventId::new(), new_event("Meetup", 10), Utc::now()).unwrap();
        let before = event.starts_at() - Duration::days(1);
        let after = event.starts_at() + Duration::days(1);

        assert!(event.matches(&EventFilter::default()));
        assert!(event.matches(&EventFilter { starts_after: Some(before) }));
        assert!(!event.matches(&EventFilter { starts_after: Some(after) }));
    }
}

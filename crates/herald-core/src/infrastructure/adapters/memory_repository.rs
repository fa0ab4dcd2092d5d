//! In-memory repository for any [`Entity`]
//!
//! Backed by `DashMap` for concurrent access. Uniqueness keys are claimed
//! through the map's entry API, so two concurrent inserts with the same key
//! cannot both succeed. Every write completes synchronously once the future
//! is polled, which means a dropped or cancelled call leaves no partial
//! state behind.

use crate::domain::ports::{Page, Pagination, Repository};
use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use herald_domain::{DomainError, DomainResult, Entity};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe in-memory repository
///
/// Clones share the same storage.
#[derive(Debug)]
pub struct InMemoryRepository<E: Entity> {
    entities: Arc<DashMap<E::Id, E>>,
    unique_keys: Arc<DashMap<String, E::Id>>,
    writes: Arc<AtomicU64>,
    /// When set, every write fails with this reason
    write_failure: Arc<RwLock<Option<String>>>,
}

impl<E: Entity> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            entities: Arc::new(DashMap::new()),
            unique_keys: Arc::new(DashMap::new()),
            writes: Arc::new(AtomicU64::new(0)),
            write_failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Store entities directly, bypassing uniqueness checks and the
    /// write counter
    pub fn seed(&self, entities: impl IntoIterator<Item = E>) {
        for entity in entities {
            if let Some(key) = entity.unique_key() {
                self.unique_keys.insert(key, entity.id());
            }
            self.entities.insert(entity.id(), entity);
        }
    }

    /// Make every following write fail with a persistence error
    pub fn fail_writes(&self, reason: impl Into<String>) {
        *self.write_failure.write() = Some(reason.into());
    }

    /// Undo [`fail_writes`](Self::fail_writes)
    pub fn recover(&self) {
        *self.write_failure.write() = None;
    }

    /// Number of successful writes
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Stored entity, without going through the port
    pub fn get(&self, id: &E::Id) -> Option<E> {
        self.entities.get(id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: &E::Id) -> bool {
        self.entities.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&self) {
        self.entities.clear();
        self.unique_keys.clear();
    }

    /// Matching entities in listing order
    fn sorted_matching(&self, filter: &E::Filter) -> Vec<E> {
        let mut items: Vec<E> = self
            .entities
            .iter()
            .filter(|entry| entry.value().matches(filter))
            .map(|entry| entry.value().clone())
            .collect();
        items.sort_by_key(|entity| entity.sort_key());
        items
    }
}

impl<E: Entity> Clone for InMemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            entities: Arc::clone(&self.entities),
            unique_keys: Arc::clone(&self.unique_keys),
            writes: Arc::clone(&self.writes),
            write_failure: Arc::clone(&self.write_failure),
        }
    }
}

impl<E: Entity> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn add(&self, entity: E) -> DomainResult<E> {
        let failure = self.write_failure.read().clone();
        if let Some(reason) = failure {
            return Err(DomainError::persistence(reason));
        }

        let id = entity.id();
        if self.entities.contains_key(&id) {
            return Err(DomainError::conflict(format!("{} {} already exists", E::NAME, id)));
        }

        if let Some(key) = entity.unique_key() {
            match self.unique_keys.entry(key) {
                Entry::Occupied(occupied) => {
                    return Err(DomainError::conflict(format!(
                        "{} with key {} already exists",
                        E::NAME,
                        occupied.key()
                    )));
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(id);
                }
            }
        }

        self.entities.insert(id, entity.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(entity)
    }

    async fn get_by_id(&self, id: E::Id) -> DomainResult<E> {
        self.entities
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| DomainError::not_found(E::NAME, id))
    }

    async fn list(&self, filter: E::Filter, pagination: Pagination) -> DomainResult<Page<E>> {
        Ok(pagination.apply(self.sorted_matching(&filter)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use herald_domain::{
        Contact, Event, EventFilter, EventId, NewEvent, NewReview, Review, ReviewFilter, ReviewId,
    };

    fn event(title: &str, day: u32) -> Event {
        Event::create(
            EventId::new(),
            NewEvent {
                title: title.to_string(),
                venue: "Hall".to_string(),
                starts_at: Utc.with_ymd_and_hms(2030, 1, day, 18, 0, 0).unwrap(),
                capacity: 10,
                organizer: Contact::new("Org").with_email("org@example.com"),
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn review(event_id: EventId, email: &str) -> Review {
        Review::create(
            ReviewId::new(),
            NewReview {
                event_id,
                reviewer: Contact::new("Bo").with_email(email),
                rating: 4,
                comment: "fine".to_string(),
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let repo = InMemoryRepository::<Event>::new();
        let stored = repo.add(event("Meetup", 3)).await.unwrap();

        let fetched = repo.get_by_id(stored.id()).await.unwrap();
        assert_eq!(fetched.title(), "Meetup");
        assert_eq!(repo.write_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_entity_is_not_found() {
        let repo = InMemoryRepository::<Event>::new();
        let err = repo.get_by_id(EventId::new()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unique_key_conflict() {
        let repo = InMemoryRepository::<Review>::new();
        let event_id = EventId::new();

        repo.add(review(event_id, "bo@example.com")).await.unwrap();
        let err = repo
            .add(review(event_id, "BO@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ConflictViolation(_)));
        assert_eq!(repo.len(), 1);
        assert_eq!(repo.write_count(), 1);

        // Same reviewer, different event
        repo.add(review(EventId::new(), "bo@example.com"))
            .await
            .unwrap();
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_writes_store_nothing() {
        let repo = InMemoryRepository::<Event>::new();
        repo.fail_writes("disk full");

        let err = repo.add(event("Meetup", 3)).await.unwrap_err();
        assert_eq!(err, DomainError::persistence("disk full"));
        assert!(repo.is_empty());

        repo.recover();
        repo.add(event("Meetup", 3)).await.unwrap();
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_list_sorted_filtered_paginated() {
        let repo = InMemoryRepository::<Event>::new();
        repo.seed([event("Third", 20), event("First", 2), event("Second", 10)]);

        let page = repo
            .list(EventFilter::default(), Pagination::new(0, 2))
            .await
            .unwrap();
        let titles: Vec<_> = page.items.iter().map(|e| e.title().to_string()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert_eq!(page.total_count, 3);
        assert!(page.has_more);

        let after = Utc.with_ymd_and_hms(2030, 1, 2, 18, 0, 0).unwrap() + Duration::hours(1);
        let upcoming = repo
            .list(
                EventFilter {
                    starts_after: Some(after),
                },
                Pagination::all(),
            )
            .await
            .unwrap();
        assert_eq!(upcoming.total_count, 2);
        assert!(!upcoming.has_more);
    }

    #[tokio::test]
    async fn test_list_reviews_by_event() {
        let repo = InMemoryRepository::<Review>::new();
        let event_id = EventId::new();
        repo.add(review(event_id, "a@example.com")).await.unwrap();
        repo.add(review(event_id, "b@example.com")).await.unwrap();
        repo.add(review(EventId::new(), "c@example.com"))
            .await
            .unwrap();

        let page = repo
            .list(
                ReviewFilter {
                    event_id: Some(event_id),
                },
                Pagination::all(),
            )
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|r| r.event_id() == event_id));
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_reviews_single_winner() {
        let repo = InMemoryRepository::<Review>::new();
        let event_id = EventId::new();

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.add(review(event_id, "same@example.com")).await })
            })
            .collect();

        let mut successes = 0;
        for task in tasks {
            if task.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.len(), 1);
    }
}

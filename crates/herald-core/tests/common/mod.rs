//! Common test utilities and instrumented adapters
//!
//! Shared by the integration tests in this directory

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use herald::application::{CreateEventCommand, CreateReviewCommand, DeliveryReport};
use herald::domain::{Entity, EventId};
use herald::{
    Channel, Contact, DeliveryReceipt, DeliveryMode, Dispatcher, DomainResult, Event,
    InMemoryRepository, NotificationError, NotificationMessage, NotificationPort,
    NotificationConfig, Page, Pagination, PipelineConfig, Ports, Repository, RetryPolicy,
    Review, SideEffectRunner, TimeProvider, OutboxNotifier,
};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Ordered record of port calls across all instrumented adapters
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<parking_lot::Mutex<Vec<String>>>,
}

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.entries.lock().iter().position(|e| e.starts_with(prefix))
    }
}

/// Repository that journals reads and successful writes
pub struct JournalRepository<E: Entity> {
    inner: InMemoryRepository<E>,
    journal: Journal,
}

impl<E: Entity> JournalRepository<E> {
    pub fn new(inner: InMemoryRepository<E>, journal: Journal) -> Self {
        Self { inner, journal }
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for JournalRepository<E> {
    async fn add(&self, entity: E) -> DomainResult<E> {
        let stored = self.inner.add(entity).await?;
        self.journal.record(format!("write:{}", E::NAME));
        Ok(stored)
    }

    async fn get_by_id(&self, id: E::Id) -> DomainResult<E> {
        self.journal.record(format!("get:{}", E::NAME));
        self.inner.get_by_id(id).await
    }

    async fn list(&self, filter: E::Filter, pagination: Pagination) -> DomainResult<Page<E>> {
        self.journal.record(format!("list:{}", E::NAME));
        self.inner.list(filter, pagination).await
    }
}

/// Notifier that journals every attempt before delegating
pub struct JournalNotifier {
    inner: OutboxNotifier,
    journal: Journal,
}

impl JournalNotifier {
    pub fn new(inner: OutboxNotifier, journal: Journal) -> Self {
        Self { inner, journal }
    }
}

#[async_trait]
impl NotificationPort for JournalNotifier {
    fn channel(&self) -> Channel {
        self.inner.channel()
    }

    async fn send(
        &self,
        message: &NotificationMessage,
    ) -> Result<DeliveryReceipt, NotificationError> {
        self.journal
            .record(format!("notify:{}:{}", message.channel, message.recipient));
        self.inner.send(message).await
    }
}

/// Mail port whose sends never finish
#[derive(Debug, Clone, Default)]
pub struct StalledNotifier {
    attempts: Arc<std::sync::atomic::AtomicUsize>,
}

impl StalledNotifier {
    pub fn attempts(&self) -> usize {
        self.attempts.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationPort for StalledNotifier {
    fn channel(&self) -> Channel {
        Channel::Mail
    }

    async fn send(
        &self,
        _message: &NotificationMessage,
    ) -> Result<DeliveryReceipt, NotificationError> {
        self.attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Err(NotificationError::Unavailable {
            channel: Channel::Mail,
            reason: "stalled".to_string(),
        })
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeProvider(pub DateTime<Utc>);

impl TimeProvider for FixedTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 6, 1, 12, 0, 0).unwrap()
}

/// Dispatcher over in-memory adapters with handles to inspect them
pub struct Harness {
    pub dispatcher: Dispatcher,
    pub events: InMemoryRepository<Event>,
    pub reviews: InMemoryRepository<Review>,
    pub mail: OutboxNotifier,
    pub sms: OutboxNotifier,
    pub journal: Journal,
    pub reports: mpsc::UnboundedReceiver<DeliveryReport>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_notifications(NotificationConfig {
            mode: DeliveryMode::Inline,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_notifications(notifications: NotificationConfig) -> Self {
        let journal = Journal::default();
        let events = InMemoryRepository::<Event>::new();
        let reviews = InMemoryRepository::<Review>::new();
        let mail = OutboxNotifier::new(Channel::Mail);
        let sms = OutboxNotifier::new(Channel::Sms);

        let ports = Ports::new(
            Arc::new(JournalRepository::new(events.clone(), journal.clone())),
            Arc::new(JournalRepository::new(reviews.clone(), journal.clone())),
        )
        .with_notifier(Arc::new(JournalNotifier::new(mail.clone(), journal.clone())))
        .with_notifier(Arc::new(JournalNotifier::new(sms.clone(), journal.clone())))
        .with_clock(Arc::new(FixedTimeProvider(fixed_now())));

        let (runner, reports) = SideEffectRunner::with_reports(&notifications);
        let dispatcher = ports
            .dispatcher_builder()
            .with_config(PipelineConfig {
                notifications: notifications.clone(),
            })
            .with_side_effect_runner(runner)
            .build()
            .unwrap();

        Self {
            dispatcher,
            events,
            reviews,
            mail,
            sms,
            journal,
            reports,
        }
    }

    /// Store an event directly and return its id
    pub async fn seed_event(&self, title: &str, days_from_now: i64) -> EventId {
        let command = event_command(title, days_from_now);
        let event = Event::create(
            EventId::new(),
            herald::domain::NewEvent {
                title: command.title,
                venue: command.venue,
                starts_at: command.starts_at,
                capacity: command.capacity,
                organizer: command.organizer,
            },
            fixed_now(),
        )
        .unwrap();
        self.events.seed([event.clone()]);
        event.id()
    }
}

pub fn organizer() -> Contact {
    Contact::new("Olga Organizer")
        .with_email("olga@example.com")
        .with_phone("+15550001")
}

pub fn reviewer() -> Contact {
    Contact::new("Rita Reviewer").with_email("rita@example.com")
}

pub fn event_command(title: &str, days_from_now: i64) -> CreateEventCommand {
    CreateEventCommand {
        title: title.to_string(),
        venue: "Main Hall".to_string(),
        starts_at: fixed_now() + chrono::Duration::days(days_from_now),
        capacity: 120,
        organizer: organizer(),
    }
}

pub fn review_command(event_id: EventId, rating: u8, comment: &str) -> CreateReviewCommand {
    CreateReviewCommand {
        event_id,
        reviewer: reviewer(),
        rating,
        comment: comment.to_string(),
    }
}

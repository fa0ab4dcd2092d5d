//! Standard handler wiring

use crate::application::dispatcher::{Dispatcher, DispatcherBuilder, RegistrationError};
use crate::application::handlers::{
    CreateEventHandler, CreateReviewHandler, GetEventHandler, GetEventReviewsHandler,
    GetEventsListHandler,
};
use crate::config::PipelineConfig;
use crate::domain::ports::{NotificationPort, Repository, SystemTimeProvider, TimeProvider};
use herald_domain::{Event, Review};
use std::sync::Arc;

/// Adapters the standard handlers are constructed from
#[derive(Clone)]
pub struct Ports {
    pub events: Arc<dyn Repository<Event>>,
    pub reviews: Arc<dyn Repository<Review>>,
    /// One port per channel; order decides send order
    pub notifiers: Vec<Arc<dyn NotificationPort>>,
    pub clock: Arc<dyn TimeProvider>,
}

impl Ports {
    pub fn new(events: Arc<dyn Repository<Event>>, reviews: Arc<dyn Repository<Review>>) -> Self {
        Self {
            events,
            reviews,
            notifiers: Vec::new(),
            clock: Arc::new(SystemTimeProvider),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationPort>) -> Self {
        self.notifiers.push(notifier);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.clock = clock;
        self
    }

    /// Builder with a handler registered for every request kind
    pub fn dispatcher_builder(&self) -> DispatcherBuilder {
        DispatcherBuilder::new()
            .register(CreateEventHandler::new(
                Arc::clone(&self.events),
                self.notifiers.clone(),
                Arc::clone(&self.clock),
            ))
            .register(CreateReviewHandler::new(
                Arc::clone(&self.events),
                Arc::clone(&self.reviews),
                self.notifiers.clone(),
                Arc::clone(&self.clock),
            ))
            .register(GetEventsListHandler::new(
                Arc::clone(&self.events),
                Arc::clone(&self.clock),
            ))
            .register(GetEventHandler::new(Arc::clone(&self.events)))
            .register(GetEventReviewsHandler::new(
                Arc::clone(&self.events),
                Arc::clone(&self.reviews),
            ))
    }

    /// Complete dispatcher using `config`
    pub fn dispatcher(&self, config: PipelineConfig) -> Result<Dispatcher, RegistrationError> {
        self.dispatcher_builder().with_config(config).build()
    }
}

impl std::fmt::Debug for Ports {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let channels: Vec<_> = self.notifiers.iter().map(|n| n.channel()).collect();
        f.debug_struct("Ports")
            .field("notifiers", &channels)
            .finish_non_exhaustive()
    }
}

//! Event handlers

use super::{Handler, HandlerOutcome, HandlerResult};
use crate::application::commands::CreateEventCommand;
use crate::application::queries::{GetEventQuery, GetEventsListQuery};
use crate::application::responses::{EventCreated, EventDetails, EventSummary, EventsList};
use crate::application::side_effects::PostCommit;
use crate::application::{ApplicationError, RequestContext};
use crate::domain::ports::{NotificationPort, Repository, TimeProvider};
use async_trait::async_trait;
use herald_domain::{Event, EventFilter, EventId, NewEvent};
use std::sync::Arc;
use tracing::debug;

/// Handler for creating events
pub struct CreateEventHandler {
    events: Arc<dyn Repository<Event>>,
    notifiers: Vec<Arc<dyn NotificationPort>>,
    clock: Arc<dyn TimeProvider>,
}

impl CreateEventHandler {
    pub fn new(
        events: Arc<dyn Repository<Event>>,
        notifiers: Vec<Arc<dyn NotificationPort>>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            events,
            notifiers,
            clock,
        }
    }
}

#[async_trait]
impl Handler for CreateEventHandler {
    type Request = CreateEventCommand;

    async fn handle(
        &self,
        command: CreateEventCommand,
        ctx: &RequestContext,
    ) -> HandlerResult<CreateEventCommand> {
        let event = Event::create(
            EventId::new(),
            NewEvent {
                title: command.title,
                venue: command.venue,
                starts_at: command.starts_at,
                capacity: command.capacity,
                organizer: command.organizer,
            },
            self.clock.now(),
        )
        .map_err(ApplicationError::from)?;

        let event = ctx.guard(self.events.add(event)).await?;
        debug!(event_id = %event.id(), "event stored");

        let mut post_commit = PostCommit::new();
        post_commit.notify_contact(
            &self.notifiers,
            event.organizer(),
            "Your event is published",
            &format!(
                "\"{}\" at {} on {} is now open for reviews.",
                event.title(),
                event.venue(),
                event.starts_at().format("%Y-%m-%d %H:%M UTC")
            ),
        );

        Ok(HandlerOutcome::respond(EventCreated {
            event_id: event.id(),
        })
        .with_post_commit(post_commit))
    }
}

/// Handler for listing events
pub struct GetEventsListHandler {
    events: Arc<dyn Repository<Event>>,
    clock: Arc<dyn TimeProvider>,
}

impl GetEventsListHandler {
    pub fn new(events: Arc<dyn Repository<Event>>, clock: Arc<dyn TimeProvider>) -> Self {
        Self { events, clock }
    }
}

#[async_trait]
impl Handler for GetEventsListHandler {
    type Request = GetEventsListQuery;

    async fn handle(
        &self,
        query: GetEventsListQuery,
        ctx: &RequestContext,
    ) -> HandlerResult<GetEventsListQuery> {
        let filter = EventFilter {
            starts_after: query.upcoming_only.then(|| self.clock.now()),
        };

        let page = ctx
            .guard(self.events.list(filter, query.pagination()))
            .await?;

        let page = page.map(|event| EventSummary::from(&event));
        Ok(HandlerOutcome::respond(EventsList {
            total_count: page.total_count,
            has_more: page.has_more,
            events: page.items,
        }))
    }
}

/// Handler for fetching one event
pub struct GetEventHandler {
    events: Arc<dyn Repository<Event>>,
}

impl GetEventHandler {
    pub fn new(events: Arc<dyn Repository<Event>>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl Handler for GetEventHandler {
    type Request = GetEventQuery;

    async fn handle(&self, query: GetEventQuery, ctx: &RequestContext) -> HandlerResult<GetEventQuery> {
        let event = ctx.guard(self.events.get_by_id(query.event_id)).await?;
        Ok(HandlerOutcome::respond(EventDetails::from(&event)))
    }
}

//! Review handlers

use super::{Handler, HandlerOutcome, HandlerResult};
use crate::application::commands::CreateReviewCommand;
use crate::application::queries::GetEventReviewsQuery;
use crate::application::responses::{EventReviews, ReviewCreated, ReviewView};
use crate::application::side_effects::PostCommit;
use crate::application::{ApplicationError, RequestContext};
use crate::domain::ports::{NotificationPort, Pagination, Repository, TimeProvider};
use async_trait::async_trait;
use herald_domain::{Event, NewReview, Review, ReviewFilter, ReviewId};
use std::sync::Arc;
use tracing::debug;

pub const REVIEW_THANKS_SUBJECT: &str = "Thanks for your review!";
pub const NEW_REVIEW_SUBJECT: &str = "New review for your event";

/// Handler for creating reviews
///
/// The event must exist. One review per reviewer and event; the
/// repository reports a repeat as a conflict.
pub struct CreateReviewHandler {
    events: Arc<dyn Repository<Event>>,
    reviews: Arc<dyn Repository<Review>>,
    notifiers: Vec<Arc<dyn NotificationPort>>,
    clock: Arc<dyn TimeProvider>,
}

impl CreateReviewHandler {
    pub fn new(
        events: Arc<dyn Repository<Event>>,
        reviews: Arc<dyn Repository<Review>>,
        notifiers: Vec<Arc<dyn NotificationPort>>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            events,
            reviews,
            notifiers,
            clock,
        }
    }
}

#[async_trait]
impl Handler for CreateReviewHandler {
    type Request = CreateReviewCommand;

    async fn handle(
        &self,
        command: CreateReviewCommand,
        ctx: &RequestContext,
    ) -> HandlerResult<CreateReviewCommand> {
        let event = ctx.guard(self.events.get_by_id(command.event_id)).await?;

        let review = Review::create(
            ReviewId::new(),
            NewReview {
                event_id: event.id(),
                reviewer: command.reviewer,
                rating: command.rating,
                comment: command.comment,
            },
            self.clock.now(),
        )
        .map_err(ApplicationError::from)?;

        let review = ctx.guard(self.reviews.add(review)).await?;
        debug!(review_id = %review.id(), event_id = %event.id(), "review stored");

        let mut post_commit = PostCommit::new();
        post_commit.notify_contact(
            &self.notifiers,
            review.reviewer(),
            REVIEW_THANKS_SUBJECT,
            &format!(
                "Hi {}, thanks for rating \"{}\" {}.",
                review.reviewer().name,
                event.title(),
                review.rating()
            ),
        );
        post_commit.notify_contact(
            &self.notifiers,
            event.organizer(),
            NEW_REVIEW_SUBJECT,
            &format!(
                "{} rated \"{}\" {}: {}",
                review.reviewer().name,
                event.title(),
                review.rating(),
                review.comment()
            ),
        );

        Ok(HandlerOutcome::respond(ReviewCreated {
            review_id: review.id(),
        })
        .with_post_commit(post_commit))
    }
}

/// Handler for listing the reviews of an event
pub struct GetEventReviewsHandler {
    events: Arc<dyn Repository<Event>>,
    reviews: Arc<dyn Repository<Review>>,
}

impl GetEventReviewsHandler {
    pub fn new(events: Arc<dyn Repository<Event>>, reviews: Arc<dyn Repository<Review>>) -> Self {
        Self { events, reviews }
    }
}

#[async_trait]
impl Handler for GetEventReviewsHandler {
    type Request = GetEventReviewsQuery;

    async fn handle(
        &self,
        query: GetEventReviewsQuery,
        ctx: &RequestContext,
    ) -> HandlerResult<GetEventReviewsQuery> {
        let event = ctx.guard(self.events.get_by_id(query.event_id)).await?;

        let filter = ReviewFilter {
            event_id: Some(event.id()),
        };
        let page = ctx
            .guard(self.reviews.list(filter, Pagination::all()))
            .await?;

        let views = page.map(|review| ReviewView::from(&review));
        Ok(HandlerOutcome::respond(EventReviews::new(event.id(), views.items)))
    }
}

//! Property-based tests for request validation

use chrono::{TimeZone, Utc};
use herald::application::{
    CreateEventCommand, CreateReviewCommand, GetEventsListQuery, Validate,
};
use herald::{Contact, EventId, Request};
use proptest::prelude::*;

fn contact_strategy() -> impl Strategy<Value = Contact> {
    (
        "[A-Za-z ]{0,12}",
        proptest::option::of("[a-z]{1,6}@[a-z]{1,6}\\.(com|org)"),
        proptest::option::of("\\+[0-9]{6,10}"),
    )
        .prop_map(|(name, email, phone)| Contact {
            name,
            email,
            phone,
        })
}

fn review_strategy() -> impl Strategy<Value = CreateReviewCommand> {
    (contact_strategy(), any::<u8>(), ".{0,40}").prop_map(|(reviewer, rating, comment)| {
        CreateReviewCommand {
            event_id: EventId::new(),
            reviewer,
            rating,
            comment,
        }
    })
}

fn event_strategy() -> impl Strategy<Value = CreateEventCommand> {
    (".{0,40}", ".{0,20}", 0u32..1_000, contact_strategy()).prop_map(
        |(title, venue, capacity, organizer)| CreateEventCommand {
            title,
            venue,
            starts_at: Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap(),
            capacity,
            organizer,
        },
    )
}

proptest! {
    #[test]
    fn prop_review_validation_is_pure(command in review_strategy()) {
        let first = command.validate();
        let second = command.validate();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_event_validation_is_pure(command in event_strategy()) {
        prop_assert_eq!(command.validate(), command.validate());
    }

    #[test]
    fn prop_rating_rule_matches_range(command in review_strategy()) {
        let rating_failed = command
            .validate()
            .failures()
            .iter()
            .any(|f| f.message == "rating out of range");
        prop_assert_eq!(rating_failed, !(1..=5).contains(&command.rating));
    }

    #[test]
    fn prop_envelope_validates_like_inner(command in review_strategy()) {
        let envelope = Request::CreateReview(command.clone());
        prop_assert_eq!(envelope.validate(), command.validate());
    }

    #[test]
    fn prop_page_size_rule(limit in 0usize..300) {
        let query = GetEventsListQuery { limit, ..GetEventsListQuery::default() };
        prop_assert_eq!(query.validate().is_valid(), (1..=100).contains(&limit));
    }
}

//! Request and response envelopes
//!
//! The set of requests is closed: [`Request`] wraps every command and
//! query, [`RequestKind`] enumerates them, and the dispatcher registry is
//! keyed by kind. Each concrete request also implements [`RequestMessage`]
//! so callers can dispatch it with a typed response.

use crate::application::{commands::*, queries::*, responses::*, validation::*};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Enumerable request identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    CreateEvent,
    CreateReview,
    GetEventsList,
    GetEvent,
    GetEventReviews,
}

impl RequestKind {
    /// Every kind; a complete dispatcher has a handler for each
    pub const ALL: [RequestKind; 5] = [
        RequestKind::CreateEvent,
        RequestKind::CreateReview,
        RequestKind::GetEventsList,
        RequestKind::GetEvent,
        RequestKind::GetEventReviews,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateEvent => "create_event",
            Self::CreateReview => "create_review",
            Self::GetEventsList => "get_events_list",
            Self::GetEvent => "get_event",
            Self::GetEventReviews => "get_event_reviews",
        }
    }

    /// Commands mutate state; everything else is a query
    pub fn is_command(&self) -> bool {
        matches!(self, Self::CreateEvent | Self::CreateReview)
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any request the dispatcher accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Request {
    CreateEvent(CreateEventCommand),
    CreateReview(CreateReviewCommand),
    GetEventsList(GetEventsListQuery),
    GetEvent(GetEventQuery),
    GetEventReviews(GetEventReviewsQuery),
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::CreateEvent(_) => RequestKind::CreateEvent,
            Self::CreateReview(_) => RequestKind::CreateReview,
            Self::GetEventsList(_) => RequestKind::GetEventsList,
            Self::GetEvent(_) => RequestKind::GetEvent,
            Self::GetEventReviews(_) => RequestKind::GetEventReviews,
        }
    }
}

impl Validate for Request {
    fn validate(&self) -> ValidationResult {
        match self {
            Self::CreateEvent(r) => r.validate(),
            Self::CreateReview(r) => r.validate(),
            Self::GetEventsList(r) => r.validate(),
            Self::GetEvent(r) => r.validate(),
            Self::GetEventReviews(r) => r.validate(),
        }
    }
}

/// Any response the dispatcher returns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Response {
    EventCreated(EventCreated),
    ReviewCreated(ReviewCreated),
    EventsList(EventsList),
    Event(EventDetails),
    EventReviews(EventReviews),
}

/// A concrete request type with a known response type
pub trait RequestMessage: Validate + Send + Sized + 'static {
    const KIND: RequestKind;

    type Response: Send + 'static;

    fn into_request(self) -> Request;

    /// Give the envelope back if it holds another kind
    fn from_request(request: Request) -> Result<Self, Request>;

    fn wrap_response(response: Self::Response) -> Response;

    /// Give the envelope back if it holds another kind's response
    fn unwrap_response(response: Response) -> Result<Self::Response, Response>;
}

macro_rules! request_message {
    ($request:ty => $variant:ident, $response:ty => $response_variant:ident) => {
        impl RequestMessage for $request {
            const KIND: RequestKind = RequestKind::$variant;

            type Response = $response;

            fn into_request(self) -> Request {
                Request::$variant(self)
            }

            fn from_request(request: Request) -> Result<Self, Request> {
                match request {
                    Request::$variant(inner) => Ok(inner),
                    other => Err(other),
                }
            }

            fn wrap_response(response: $response) -> Response {
                Response::$response_variant(response)
            }

            fn unwrap_response(response: Response) -> Result<$response, Response> {
                match response {
                    Response::$response_variant(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }

        impl From<$request> for Request {
            fn from(request: $request) -> Self {
                Request::$variant(request)
            }
        }
    };
}

request_message!(CreateEventCommand => CreateEvent, EventCreated => EventCreated);
request_message!(CreateReviewCommand => CreateReview, ReviewCreated => ReviewCreated);
request_message!(GetEventsListQuery => GetEventsList, EventsList => EventsList);
request_message!(GetEventQuery => GetEvent, EventDetails => Event);
request_message!(GetEventReviewsQuery => GetEventReviews, EventReviews => EventReviews);

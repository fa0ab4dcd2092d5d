//! Domain Value Objects
//!
//! Immutable objects defined only by their attributes.

mod contact;
mod id;
mod rating;

pub use contact::{Channel, Contact};
pub use id::{EventId, EventMarker, Id, IdMarker, ReviewId, ReviewMarker};
pub use rating::Rating;

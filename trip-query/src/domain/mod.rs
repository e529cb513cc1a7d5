//! Domain types for trip queries.
//!
//! This module contains the types providers hand back to the client:
//! locations, stops, trip parts and trips. Types with invariants enforce
//! them at construction, so code that receives them can trust their
//! validity.

mod error;
mod location;
mod stop;
mod time;
mod trip;

pub use error::DomainError;
pub use location::Location;
pub use stop::Stop;
pub use time::{DISPLAY_FORMAT, FormatError, QueryTime, parse_datetime, parse_when};
pub use trip::{Trip, TripPart, TripStatus};

//! Conversion helpers shared by the HTTP adapters.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use tracing::warn;

use crate::domain::{DomainError, Trip};

/// Line label used for walking legs.
pub const WALK_LINE: &str = "walk";

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A field is present but unusable
    #[error("invalid field {field}: {value}")]
    InvalidField { field: &'static str, value: String },

    /// The converted data violates a domain invariant
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The response held trips but none survived conversion
    #[error("none of {count} trips could be converted (first error: {first})")]
    NothingConverted { count: usize, first: String },
}

/// Collect converted trips, skipping the ones that failed.
///
/// Skips are logged at `warn`. A response that had trips but yielded
/// none is an error; an empty response is not.
pub fn collect_trips<I>(provider: &str, converted: I) -> Result<Vec<Trip>, ConversionError>
where
    I: IntoIterator<Item = Result<Trip, ConversionError>>,
{
    let mut trips = Vec::new();
    let mut count = 0;
    let mut first = None;

    for (index, result) in converted.into_iter().enumerate() {
        count += 1;
        match result {
            Ok(trip) => trips.push(trip),
            Err(e) => {
                warn!(provider, index, error = %e, "Skipping unconvertible trip");
                first.get_or_insert_with(|| e.to_string());
            }
        }
    }

    match first {
        Some(first) if trips.is_empty() => Err(ConversionError::NothingConverted { count, first }),
        _ => Ok(trips),
    }
}

/// Wall-clock time at the stop.
pub(crate) fn wall_time(time: Option<DateTime<FixedOffset>>) -> Option<NaiveDateTime> {
    time.map(|t| t.naive_local())
}

/// UTC offset of a wire time in seconds east of UTC.
pub(crate) fn utc_offset(time: Option<DateTime<FixedOffset>>) -> Option<i32> {
    time.map(|t| t.offset().local_minus_utc())
}

//! Requested query time handling.
//!
//! Users pass the time of a trip query as `YYYY-MM-DDTHH:MM` in local time,
//! or omit it to mean "now". Parsing is strict: anything that is not exactly
//! that shape is rejected before any provider is contacted.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// Format used when printing scheduled times (`2024-03-01 08:30`).
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Error returned when a query time string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time '{input}': {reason}")]
pub struct FormatError {
    input: String,
    reason: &'static str,
}

impl FormatError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }

    /// Returns why the input was rejected.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/// The point in time a trip query refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTime {
    /// Use the current local time when the trip search is issued.
    Now,
    /// A fixed local date and time (seconds are always zero).
    At(NaiveDateTime),
}

impl QueryTime {
    /// Resolve to a concrete date-time, using `now` for [`QueryTime::Now`].
    pub fn resolve(&self, now: NaiveDateTime) -> NaiveDateTime {
        match self {
            QueryTime::Now => now,
            QueryTime::At(at) => *at,
        }
    }

    /// Resolve against the local wall clock.
    pub fn resolve_local(&self) -> NaiveDateTime {
        self.resolve(Local::now().naive_local())
    }
}

impl fmt::Display for QueryTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryTime::Now => f.write_str("now"),
            QueryTime::At(at) => write!(f, "{}", at.format(DISPLAY_FORMAT)),
        }
    }
}

/// Parse an optional `--when` value.
///
/// # Examples
///
/// ```
/// use trip_query::domain::{parse_when, QueryTime};
///
/// assert_eq!(parse_when(None).unwrap(), QueryTime::Now);
///
/// let at = parse_when(Some("2024-03-01T08:30")).unwrap();
/// assert_eq!(at.to_string(), "2024-03-01 08:30");
///
/// assert!(parse_when(Some("2024-03-01 08:30")).is_err());
/// assert!(parse_when(Some("2024-03-01T0830")).is_err());
/// assert!(parse_when(Some("2024-02-30T08:30")).is_err());
/// ```
pub fn parse_when(input: Option<&str>) -> Result<QueryTime, FormatError> {
    match input {
        None => Ok(QueryTime::Now),
        Some(s) => parse_datetime(s).map(QueryTime::At),
    }
}

/// Parse `YYYY-MM-DDTHH:MM` into a local date-time with zero seconds.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime, FormatError> {
    let (date_part, time_part) = s
        .split_once('T')
        .ok_or_else(|| FormatError::new(s, "expected YYYY-MM-DDTHH:MM"))?;

    let date_fields: Vec<&str> = date_part.split('-').collect();
    if date_fields.len() != 3 {
        return Err(FormatError::new(s, "date must be YYYY-MM-DD"));
    }
    let year = parse_digits(date_fields[0], 4)
        .ok_or_else(|| FormatError::new(s, "invalid year"))?;
    let month = parse_digits(date_fields[1], 2)
        .ok_or_else(|| FormatError::new(s, "invalid month"))?;
    let day = parse_digits(date_fields[2], 2)
        .ok_or_else(|| FormatError::new(s, "invalid day"))?;

    let time_fields: Vec<&str> = time_part.split(':').collect();
    if time_fields.len() != 2 {
        return Err(FormatError::new(s, "time must be HH:MM"));
    }
    let hour = parse_digits(time_fields[0], 2).ok_or_else(|| FormatError::new(s, "invalid hour"))?;
    let minute =
        parse_digits(time_fields[1], 2).ok_or_else(|| FormatError::new(s, "invalid minute"))?;

    let date = NaiveDate::from_ymd_opt(year as i32, month, day)
        .ok_or_else(|| FormatError::new(s, "no such date"))?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| FormatError::new(s, "hour must be 0-23 and minute 0-59"))?;

    Ok(date.and_time(time))
}

/// Parse exactly `width` ASCII digits.
fn parse_digits(field: &str, width: usize) -> Option<u32> {
    if field.len() != width || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

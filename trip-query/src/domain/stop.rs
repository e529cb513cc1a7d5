//! Stop type.
//!
//! A `Stop` is a location visited by one trip part, with scheduled
//! ("booked") times, optional realtime times and platforms. Delays are
//! derived, never stored.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Location;

/// A location on a trip part with its timing.
///
/// # Time Semantics
///
/// - For the start of a part only departure fields are meaningful
/// - For the end of a part only arrival fields are meaningful
/// - Intermediate stops may carry both
/// - Realtime fields are present only when the provider has live data
/// - Times are wall-clock times at the stop; the UTC offsets, when known,
///   place them on a common timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Where the stop is
    pub location: Location,
    /// Scheduled arrival time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booked_arrival: Option<NaiveDateTime>,
    /// Scheduled departure time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booked_departure: Option<NaiveDateTime>,
    /// Realtime (estimated or actual) arrival time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realtime_arrival: Option<NaiveDateTime>,
    /// Realtime (estimated or actual) departure time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realtime_departure: Option<NaiveDateTime>,
    /// Arrival platform (if known)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_platform: Option<String>,
    /// Departure platform (if known)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_platform: Option<String>,
    /// UTC offset of the arrival times, in seconds east of UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_utc_offset: Option<i32>,
    /// UTC offset of the departure times, in seconds east of UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_utc_offset: Option<i32>,
}

impl Stop {
    /// Creates a stop with no timing information.
    pub fn new(location: Location) -> Self {
        Self {
            location,
            booked_arrival: None,
            booked_departure: None,
            realtime_arrival: None,
            realtime_departure: None,
            arrival_platform: None,
            departure_platform: None,
            arrival_utc_offset: None,
            departure_utc_offset: None,
        }
    }

    /// Returns the stop name.
    pub fn name(&self) -> &str {
        &self.location.name
    }

    /// Returns the arrival delay in whole minutes, if realtime data exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_query::domain::{Location, Stop, parse_datetime};
    ///
    /// let mut stop = Stop::new(Location::new("Hamburg Hbf"));
    /// stop.booked_arrival = Some(parse_datetime("2024-03-01T10:15").unwrap());
    ///
    /// // No realtime data, no delay
    /// assert_eq!(stop.arrival_delay(), None);
    ///
    /// stop.realtime_arrival = Some(parse_datetime("2024-03-01T10:22").unwrap());
    /// assert_eq!(stop.arrival_delay(), Some(7));
    /// ```
    pub fn arrival_delay(&self) -> Option<i64> {
        delay_minutes(self.booked_arrival, self.realtime_arrival)
    }

    /// Returns the departure delay in whole minutes, if realtime data exists.
    pub fn departure_delay(&self) -> Option<i64> {
        delay_minutes(self.booked_departure, self.realtime_departure)
    }

    /// Returns the booked arrival as an absolute instant.
    ///
    /// Without a known offset the wall time is read as UTC, which keeps
    /// stops in one time zone comparable.
    pub fn booked_arrival_instant(&self) -> Option<DateTime<Utc>> {
        Some(instant(self.booked_arrival?, self.arrival_utc_offset))
    }

    /// Returns the booked departure as an absolute instant.
    pub fn booked_departure_instant(&self) -> Option<DateTime<Utc>> {
        Some(instant(self.booked_departure?, self.departure_utc_offset))
    }

    /// Returns the best available arrival time (realtime if available, else booked).
    pub fn expected_arrival(&self) -> Option<NaiveDateTime> {
        self.realtime_arrival.or(self.booked_arrival)
    }

    /// Returns the best available departure time (realtime if available, else booked).
    pub fn expected_departure(&self) -> Option<NaiveDateTime> {
        self.realtime_departure.or(self.booked_departure)
    }
}

fn instant(wall: NaiveDateTime, offset_secs: Option<i32>) -> DateTime<Utc> {
    let offset = Duration::seconds(i64::from(offset_secs.unwrap_or(0)));
    (wall - offset).and_utc()
}

fn delay_minutes(booked: Option<NaiveDateTime>, realtime: Option<NaiveDateTime>) -> Option<i64> {
    Some(realtime?.signed_duration_since(booked?).num_minutes())
}

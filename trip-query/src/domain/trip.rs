//! Trip types.
//!
//! A `Trip` is one itinerary returned by a provider: an ordered list of
//! `TripPart`s (legs), each on a single line between two stops.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DomainError, Stop};

/// A leg of a trip (one line between two stops).
///
/// Times are validated at construction to guarantee `departure()` and
/// `arrival()` never fail.
///
/// # Invariants
///
/// - The start stop has a booked departure
/// - The end stop has a booked arrival
/// - The arrival is not before the departure, compared as absolute
///   instants so legs crossing a UTC offset change validate correctly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTripPart")]
pub struct TripPart {
    start: Stop,
    end: Stop,
    line: String,
    stops: Vec<Stop>,
    // Cached validated times
    #[serde(skip_serializing)]
    departure: NaiveDateTime,
    #[serde(skip_serializing)]
    arrival: NaiveDateTime,
    #[serde(skip_serializing)]
    departs_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    arrives_at: DateTime<Utc>,
}

/// Unvalidated trip part, as stored in fixtures.
#[derive(Debug, Deserialize)]
struct RawTripPart {
    start: Stop,
    end: Stop,
    line: String,
    #[serde(default)]
    stops: Vec<Stop>,
}

impl TryFrom<RawTripPart> for TripPart {
    type Error = DomainError;

    fn try_from(raw: RawTripPart) -> Result<Self, Self::Error> {
        TripPart::new(raw.start, raw.end, raw.line, raw.stops)
    }
}

impl TripPart {
    /// Construct a trip part, validating its times.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - The start has no booked departure
    /// - The end has no booked arrival
    /// - The booked arrival instant is before the booked departure instant
    ///
    /// # Examples
    ///
    /// ```
    /// use trip_query::domain::{Location, Stop, TripPart, parse_datetime};
    ///
    /// let mut start = Stop::new(Location::new("Berlin Hbf"));
    /// start.booked_departure = Some(parse_datetime("2024-03-01T08:30").unwrap());
    ///
    /// let mut end = Stop::new(Location::new("Hamburg Hbf"));
    /// end.booked_arrival = Some(parse_datetime("2024-03-01T10:15").unwrap());
    ///
    /// let part = TripPart::new(start, end, "ICE 1000", Vec::new()).unwrap();
    /// assert_eq!(part.duration().num_minutes(), 105);
    /// ```
    pub fn new(
        start: Stop,
        end: Stop,
        line: impl Into<String>,
        stops: Vec<Stop>,
    ) -> Result<Self, DomainError> {
        let departure = start
            .booked_departure
            .ok_or_else(|| DomainError::MissingTime("start departure".into()))?;
        let arrival = end
            .booked_arrival
            .ok_or_else(|| DomainError::MissingTime("end arrival".into()))?;

        let departs_at = start
            .booked_departure_instant()
            .ok_or_else(|| DomainError::MissingTime("start departure".into()))?;
        let arrives_at = end
            .booked_arrival_instant()
            .ok_or_else(|| DomainError::MissingTime("end arrival".into()))?;

        if arrives_at < departs_at {
            return Err(DomainError::InvalidPart("arrival must not be before departure"));
        }

        Ok(Self {
            start,
            end,
            line: line.into(),
            stops,
            departure,
            arrival,
            departs_at,
            arrives_at,
        })
    }

    /// Returns where this part starts.
    pub fn start(&self) -> &Stop {
        &self.start
    }

    /// Returns where this part ends.
    pub fn end(&self) -> &Stop {
        &self.end
    }

    /// Returns the line identifier.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Returns the intermediate stops (excluding start and end).
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Returns the booked departure time (guaranteed present).
    pub fn departure(&self) -> NaiveDateTime {
        self.departure
    }

    /// Returns the booked arrival time (guaranteed present).
    pub fn arrival(&self) -> NaiveDateTime {
        self.arrival
    }

    /// Returns the booked departure as an absolute instant.
    pub fn departure_instant(&self) -> DateTime<Utc> {
        self.departs_at
    }

    /// Returns the booked arrival as an absolute instant.
    pub fn arrival_instant(&self) -> DateTime<Utc> {
        self.arrives_at
    }

    /// Returns the scheduled duration.
    pub fn duration(&self) -> Duration {
        self.arrives_at.signed_duration_since(self.departs_at)
    }
}

/// Status of a trip as reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TripStatus {
    /// Running as planned (possibly delayed)
    #[default]
    Normal,
    /// The trip will not run
    Canceled,
}

/// A complete itinerary from origin to destination.
///
/// # Invariants
///
/// - At least one part
/// - Parts are chronologically ordered: each part arrives no later than
///   the next one departs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTrip")]
pub struct Trip {
    parts: Vec<TripPart>,
    status: TripStatus,
}

/// Unvalidated trip, as stored in fixtures.
#[derive(Debug, Deserialize)]
struct RawTrip {
    parts: Vec<TripPart>,
    #[serde(default)]
    status: TripStatus,
}

impl TryFrom<RawTrip> for Trip {
    type Error = DomainError;

    fn try_from(raw: RawTrip) -> Result<Self, Self::Error> {
        Trip::new(raw.parts, raw.status)
    }
}

impl Trip {
    /// Constructs a trip from validated parts.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - Parts list is empty
    /// - A part departs before the previous part arrives
    pub fn new(parts: Vec<TripPart>, status: TripStatus) -> Result<Self, DomainError> {
        if parts.is_empty() {
            return Err(DomainError::EmptyTrip);
        }

        for (index, pair) in parts.windows(2).enumerate() {
            if pair[0].arrival_instant() > pair[1].departure_instant() {
                return Err(DomainError::PartsOutOfOrder { index: index + 1 });
            }
        }

        Ok(Self { parts, status })
    }

    /// Returns all parts in travel order.
    pub fn parts(&self) -> &[TripPart] {
        &self.parts
    }

    /// Returns the trip status.
    pub fn status(&self) -> TripStatus {
        self.status
    }

    /// Returns true if the provider reported the trip as canceled.
    pub fn is_canceled(&self) -> bool {
        self.status == TripStatus::Canceled
    }

    /// Returns the first part.
    pub fn first_part(&self) -> &TripPart {
        // Safe: validated non-empty at construction
        &self.parts[0]
    }

    /// Returns the last part.
    pub fn last_part(&self) -> &TripPart {
        // Safe: validated non-empty at construction
        &self.parts[self.parts.len() - 1]
    }

    /// Returns the overall start stop.
    pub fn start(&self) -> &Stop {
        self.first_part().start()
    }

    /// Returns the overall end stop.
    pub fn end(&self) -> &Stop {
        self.last_part().end()
    }

    /// Returns the booked departure time of the trip.
    pub fn departure(&self) -> NaiveDateTime {
        self.first_part().departure()
    }

    /// Returns the booked arrival time of the trip.
    pub fn arrival(&self) -> NaiveDateTime {
        self.last_part().arrival()
    }

    /// Returns the delay at the overall start, if realtime data exists.
    pub fn departure_delay(&self) -> Option<i64> {
        self.start().departure_delay()
    }

    /// Returns the delay at the overall end, if realtime data exists.
    pub fn arrival_delay(&self) -> Option<i64> {
        self.end().arrival_delay()
    }

    /// Returns the number of changes between parts.
    pub fn switches(&self) -> usize {
        self.parts.len() - 1
    }

    /// Returns the scheduled total duration.
    pub fn duration(&self) -> Duration {
        self.last_part()
            .arrival_instant()
            .signed_duration_since(self.first_part().departure_instant())
    }
}

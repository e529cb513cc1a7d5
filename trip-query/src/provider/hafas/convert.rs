//! Conversion from transport.rest DTOs to domain types.
//!
//! Wire times carry a UTC offset. Stops keep the local wall time of the
//! station for display and the offset itself for ordering.

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::domain::{Location, Stop, Trip, TripPart, TripStatus};
use crate::provider::convert::{
    ConversionError, WALK_LINE, collect_trips, utc_offset, wall_time,
};

use super::types::{RawJourney, RawJourneysResponse, RawLeg, RawLocation, RawStopover};

/// Convert a `/locations` response, dropping entries without a usable name.
pub fn convert_locations(raw: Vec<RawLocation>) -> Vec<Location> {
    raw.into_iter().filter_map(convert_location).collect()
}

/// Convert a single location. Addresses without a name use the address.
pub fn convert_location(raw: RawLocation) -> Option<Location> {
    let name = raw.name.or(raw.address)?;
    let (latitude, longitude) = match raw.location {
        Some(coords) => (coords.latitude, coords.longitude),
        None => (raw.latitude, raw.longitude),
    };

    Some(Location {
        name,
        id: raw.id,
        latitude,
        longitude,
    })
}

/// Convert a `/journeys` response.
///
/// Journeys that cannot be converted are skipped and logged. If there
/// were journeys and none converted, the response is rejected.
pub fn convert_journeys(
    provider: &str,
    raw: RawJourneysResponse,
) -> Result<Vec<Trip>, ConversionError> {
    collect_trips(provider, raw.journeys.into_iter().map(convert_journey))
}

/// Convert one journey. Any cancelled leg cancels the trip.
pub fn convert_journey(raw: RawJourney) -> Result<Trip, ConversionError> {
    let status = if raw.legs.iter().any(|leg| leg.cancelled) {
        TripStatus::Canceled
    } else {
        TripStatus::Normal
    };

    let parts = raw
        .legs
        .into_iter()
        .map(convert_leg)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Trip::new(parts, status)?)
}

/// Convert one leg into a trip part.
pub fn convert_leg(raw: RawLeg) -> Result<TripPart, ConversionError> {
    let line = if raw.walking {
        WALK_LINE.to_string()
    } else {
        raw.line
            .as_ref()
            .and_then(|line| line.name.clone().or_else(|| line.id.clone()))
            .ok_or(ConversionError::MissingField("line.name"))?
    };

    let mut start = Stop::new(
        convert_location(raw.origin).ok_or(ConversionError::MissingField("origin.name"))?,
    );
    start.booked_departure = wall_time(raw.planned_departure.or(raw.departure));
    start.departure_utc_offset = utc_offset(raw.planned_departure.or(raw.departure));
    start.realtime_departure = realtime(raw.departure, raw.departure_delay);
    start.departure_platform = raw.departure_platform.or(raw.planned_departure_platform);

    let mut end = Stop::new(
        convert_location(raw.destination)
            .ok_or(ConversionError::MissingField("destination.name"))?,
    );
    end.booked_arrival = wall_time(raw.planned_arrival.or(raw.arrival));
    end.arrival_utc_offset = utc_offset(raw.planned_arrival.or(raw.arrival));
    end.realtime_arrival = realtime(raw.arrival, raw.arrival_delay);
    end.arrival_platform = raw.arrival_platform.or(raw.planned_arrival_platform);

    let stops = intermediate_stops(raw.stopovers.unwrap_or_default());

    Ok(TripPart::new(start, end, line, stops)?)
}

/// Stopovers include the origin and destination of the leg; drop them.
fn intermediate_stops(stopovers: Vec<RawStopover>) -> Vec<Stop> {
    let count = stopovers.len();
    if count <= 2 {
        return Vec::new();
    }

    stopovers
        .into_iter()
        .skip(1)
        .take(count - 2)
        .filter_map(convert_stopover)
        .collect()
}

fn convert_stopover(raw: RawStopover) -> Option<Stop> {
    let mut stop = Stop::new(convert_location(raw.stop)?);
    stop.booked_arrival = wall_time(raw.planned_arrival.or(raw.arrival));
    stop.arrival_utc_offset = utc_offset(raw.planned_arrival.or(raw.arrival));
    stop.realtime_arrival = realtime(raw.arrival, raw.arrival_delay);
    stop.arrival_platform = raw.arrival_platform.or(raw.planned_arrival_platform);
    stop.booked_departure = wall_time(raw.planned_departure.or(raw.departure));
    stop.departure_utc_offset = utc_offset(raw.planned_departure.or(raw.departure));
    stop.realtime_departure = realtime(raw.departure, raw.departure_delay);
    stop.departure_platform = raw.departure_platform.or(raw.planned_departure_platform);
    Some(stop)
}

/// A prognosed time counts as realtime data only when a delay is reported.
fn realtime(time: Option<DateTime<FixedOffset>>, delay: Option<i64>) -> Option<NaiveDateTime> {
    delay.and(wall_time(time))
}

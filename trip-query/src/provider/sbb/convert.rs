//! Conversion from transport.opendata.ch DTOs to domain types.

use chrono::{DateTime, Duration, FixedOffset};

use crate::domain::{Location, Stop, Trip, TripPart, TripStatus};
use crate::provider::convert::{
    ConversionError, WALK_LINE, collect_trips, utc_offset, wall_time,
};

use super::types::{RawCheckpoint, RawConnection, RawConnectionsResponse, RawSection, RawStation};

/// Wire format of checkpoint times.
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Convert a `/locations` response, dropping stations without a name.
pub fn convert_stations(raw: Vec<RawStation>) -> Vec<Location> {
    raw.into_iter().filter_map(convert_station).collect()
}

/// Convert a single station.
pub fn convert_station(raw: RawStation) -> Option<Location> {
    let (latitude, longitude) = match raw.coordinate {
        Some(c) => (c.x, c.y),
        None => (None, None),
    };

    Some(Location {
        name: raw.name?,
        id: raw.id,
        latitude,
        longitude,
    })
}

/// Convert a `/connections` response.
///
/// Connections that cannot be converted are skipped and logged. If there
/// were connections and none converted, the response is rejected.
pub fn convert_connections(
    provider: &str,
    raw: RawConnectionsResponse,
) -> Result<Vec<Trip>, ConversionError> {
    collect_trips(provider, raw.connections.into_iter().map(convert_connection))
}

/// Convert one connection. The API reports no cancellations.
pub fn convert_connection(raw: RawConnection) -> Result<Trip, ConversionError> {
    let parts = raw
        .sections
        .into_iter()
        .map(convert_section)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Trip::new(parts, TripStatus::Normal)?)
}

/// Convert one section into a trip part.
pub fn convert_section(raw: RawSection) -> Result<TripPart, ConversionError> {
    let (line, pass_list) = match (raw.journey, raw.walk) {
        (Some(journey), _) => {
            let line = match (journey.category, journey.number) {
                (Some(category), Some(number)) => format!("{category} {number}"),
                (category, _) => journey
                    .name
                    .or(category)
                    .ok_or(ConversionError::MissingField("journey.name"))?,
            };
            (line, journey.pass_list)
        }
        (None, Some(_)) => (WALK_LINE.to_string(), Vec::new()),
        (None, None) => return Err(ConversionError::MissingField("journey")),
    };

    let start = convert_checkpoint(raw.departure)?;
    let end = convert_checkpoint(raw.arrival)?;
    let stops = intermediate_stops(pass_list)?;

    Ok(TripPart::new(start, end, line, stops)?)
}

/// The pass list includes both section endpoints; drop them.
fn intermediate_stops(pass_list: Vec<RawCheckpoint>) -> Result<Vec<Stop>, ConversionError> {
    let count = pass_list.len();
    if count <= 2 {
        return Ok(Vec::new());
    }

    pass_list
        .into_iter()
        .skip(1)
        .take(count - 2)
        .map(convert_checkpoint)
        .collect()
}

fn convert_checkpoint(raw: RawCheckpoint) -> Result<Stop, ConversionError> {
    let location = convert_station(raw.station)
        .ok_or(ConversionError::MissingField("station.name"))?;
    let prognosis = raw.prognosis.unwrap_or_default();

    let arrival = parse_time("arrival", raw.arrival.as_deref())?;
    let departure = parse_time("departure", raw.departure.as_deref())?;
    let arrival_forecast = parse_time("prognosis.arrival", prognosis.arrival.as_deref())?;
    let departure_forecast = parse_time("prognosis.departure", prognosis.departure.as_deref())?;

    let mut stop = Stop::new(location);
    stop.booked_arrival = wall_time(arrival);
    stop.arrival_utc_offset = utc_offset(arrival);
    stop.realtime_arrival = wall_time(realtime(arrival, arrival_forecast, raw.delay));
    stop.booked_departure = wall_time(departure);
    stop.departure_utc_offset = utc_offset(departure);
    stop.realtime_departure = wall_time(realtime(departure, departure_forecast, raw.delay));

    let platform = prognosis.platform.or(raw.platform);
    stop.arrival_platform = platform.clone();
    stop.departure_platform = platform;
    Ok(stop)
}

/// Forecast time if given, else the booked time shifted by the delay.
fn realtime(
    booked: Option<DateTime<FixedOffset>>,
    forecast: Option<DateTime<FixedOffset>>,
    delay_minutes: Option<i64>,
) -> Option<DateTime<FixedOffset>> {
    let booked = booked?;
    forecast.or_else(|| delay_minutes.map(|d| booked + Duration::minutes(d)))
}

fn parse_time(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<FixedOffset>>, ConversionError> {
    value
        .map(|v| {
            DateTime::parse_from_str(v, TIME_FORMAT).map_err(|_| ConversionError::InvalidField {
                field,
                value: v.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkpoint(name: &str, arrival: &str, departure: &str, extra: &str) -> String {
        let time = |key: &str, value: &str| {
            if value.is_empty() {
                format!(r#""{key}": null"#)
            } else {
                format!(r#""{key}": "{value}""#)
            }
        };
        format!(
            r#"{{"station": {{"id": "85", "name": "{name}"}}, {}, {}{extra}}}"#,
            time("arrival", arrival),
            time("departure", departure),
        )
    }

    fn section(extra_departure: &str) -> RawSection {
        let json = format!(
            r#"{{
                "journey": {{
                    "name": "IC 1 711",
                    "category": "IC",
                    "number": "1",
                    "passList": [
                        {},
                        {},
                        {}
                    ]
                }},
                "walk": null,
                "departure": {},
                "arrival": {}
            }}"#,
            checkpoint("Bern", "", "2024-03-01T08:02:00+0100", ""),
            checkpoint("Olten", "2024-03-01T08:28:00+0100", "2024-03-01T08:30:00+0100", ""),
            checkpoint("Zürich HB", "2024-03-01T08:58:00+0100", "", ""),
            checkpoint("Bern", "", "2024-03-01T08:02:00+0100", extra_departure),
            checkpoint("Zürich HB", "2024-03-01T08:58:00+0100", "", r#", "platform": "31""#),
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn section_times_and_line() {
        let part = convert_section(section("")).unwrap();
        assert_eq!(part.line(), "IC 1");
        assert_eq!(part.start().name(), "Bern");
        assert_eq!(part.end().name(), "Zürich HB");
        assert_eq!(part.duration().num_minutes(), 56);
        assert_eq!(part.start().departure_utc_offset, Some(3600));
        assert_eq!(part.end().arrival_platform.as_deref(), Some("31"));

        let names: Vec<&str> = part.stops().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["Olten"]);
    }

    #[test]
    fn no_realtime_without_delay_or_forecast() {
        let part = convert_section(section("")).unwrap();
        assert_eq!(part.start().departure_delay(), None);
        assert_eq!(part.end().arrival_delay(), None);
    }

    #[test]
    fn delay_minutes_shift_booked_time() {
        let part = convert_section(section(r#", "delay": 3"#)).unwrap();
        assert_eq!(part.start().departure_delay(), Some(3));
    }

    #[test]
    fn forecast_wins_over_delay() {
        let extra = r#", "delay": 3,
            "prognosis": {"departure": "2024-03-01T08:06:00+0100", "platform": "7"}"#;
        let part = convert_section(section(extra)).unwrap();
        assert_eq!(part.start().departure_delay(), Some(4));
        assert_eq!(part.start().departure_platform.as_deref(), Some("7"));
    }

    #[test]
    fn walk_section() {
        let json = format!(
            r#"{{
                "journey": null,
                "walk": {{"duration": "00:05:00"}},
                "departure": {},
                "arrival": {}
            }}"#,
            checkpoint("Zürich HB", "", "2024-03-01T09:00:00+0100", ""),
            checkpoint("Zürich, Bahnhofquai", "2024-03-01T09:05:00+0100", "", ""),
        );
        let raw: RawSection = serde_json::from_str(&json).unwrap();
        let part = convert_section(raw).unwrap();
        assert_eq!(part.line(), WALK_LINE);
        assert!(part.stops().is_empty());
    }

    #[test]
    fn bad_time_rejected() {
        let json = format!(
            r#"{{"journey": {{"name": "S 1"}}, "departure": {}, "arrival": {}}}"#,
            checkpoint("Bern", "", "08:02", ""),
            checkpoint("Thun", "2024-03-01T08:20:00+0100", "", ""),
        );
        let raw: RawSection = serde_json::from_str(&json).unwrap();
        assert!(matches!(
            convert_section(raw),
            Err(ConversionError::InvalidField { field: "departure", .. })
        ));
    }

    #[test]
    fn station_coordinates_are_swapped_axes() {
        let raw: RawStation = serde_json::from_str(
            r#"{"id": "8507000", "name": "Bern", "coordinate": {"x": 46.948832, "y": 7.439136}}"#,
        )
        .unwrap();
        let loc = convert_station(raw).unwrap();
        assert_eq!(loc.coordinates(), Some((46.948832, 7.439136)));
    }

    #[test]
    fn unusable_connections_are_an_error() {
        let raw: RawConnectionsResponse =
            serde_json::from_str(r#"{"connections": [{"sections": []}]}"#).unwrap();
        assert!(matches!(
            convert_connections("ch-sbb", raw),
            Err(ConversionError::NothingConverted { count: 1, .. })
        ));
    }
}

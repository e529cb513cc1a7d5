//! transport.rest response DTOs.
//!
//! These types map directly to the JSON returned by the HAFAS REST
//! wrappers. They use `Option` liberally because the API sends `null` or
//! omits fields depending on the backend and on realtime availability.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// Coordinates nested inside a stop.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCoordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// A stop, station or address as returned by `/locations` and inside legs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    /// Entity type: "stop", "station" or "location".
    #[serde(rename = "type")]
    pub kind: Option<String>,

    /// HAFAS identifier (absent for plain addresses).
    pub id: Option<String>,

    /// Display name.
    pub name: Option<String>,

    /// Street address (for `type: location`).
    pub address: Option<String>,

    /// Top-level coordinates (for `type: location`).
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Nested coordinates (for stops and stations).
    pub location: Option<RawCoordinates>,
}

/// Response from `/journeys`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJourneysResponse {
    #[serde(default)]
    pub journeys: Vec<RawJourney>,

    /// Paging token for earlier journeys.
    pub earlier_ref: Option<String>,

    /// Paging token for later journeys.
    pub later_ref: Option<String>,
}

/// One journey.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJourney {
    #[serde(default)]
    pub legs: Vec<RawLeg>,
}

/// One leg of a journey.
///
/// `departure`/`arrival` hold the prognosed time when realtime data exists
/// and repeat the planned time otherwise; the matching `*Delay` field is
/// `null` when there is no realtime data.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLeg {
    pub origin: RawLocation,
    pub destination: RawLocation,

    pub departure: Option<DateTime<FixedOffset>>,
    pub planned_departure: Option<DateTime<FixedOffset>>,
    /// Departure delay in seconds.
    pub departure_delay: Option<i64>,
    pub departure_platform: Option<String>,
    pub planned_departure_platform: Option<String>,

    pub arrival: Option<DateTime<FixedOffset>>,
    pub planned_arrival: Option<DateTime<FixedOffset>>,
    /// Arrival delay in seconds.
    pub arrival_delay: Option<i64>,
    pub arrival_platform: Option<String>,
    pub planned_arrival_platform: Option<String>,

    pub line: Option<RawLine>,

    #[serde(default)]
    pub walking: bool,

    #[serde(default)]
    pub cancelled: bool,

    /// Calls of this leg including origin and destination
    /// (only present when requested with `stopovers=true`).
    pub stopovers: Option<Vec<RawStopover>>,
}

/// Line information of a leg.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLine {
    pub id: Option<String>,
    pub name: Option<String>,
    pub product: Option<String>,
    pub mode: Option<String>,
}

/// A call of a leg at one stop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStopover {
    pub stop: RawLocation,

    pub arrival: Option<DateTime<FixedOffset>>,
    pub planned_arrival: Option<DateTime<FixedOffset>>,
    pub arrival_delay: Option<i64>,
    pub arrival_platform: Option<String>,
    pub planned_arrival_platform: Option<String>,

    pub departure: Option<DateTime<FixedOffset>>,
    pub planned_departure: Option<DateTime<FixedOffset>>,
    pub departure_delay: Option<i64>,
    pub departure_platform: Option<String>,
    pub planned_departure_platform: Option<String>,
}

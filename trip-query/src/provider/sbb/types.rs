//! transport.opendata.ch response DTOs.
//!
//! Times arrive as strings like `2024-03-01T08:30:00+0100` (no colon in
//! the offset) and are parsed during conversion.

use serde::Deserialize;

/// WGS84 coordinate. The API puts latitude in `x` and longitude in `y`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCoordinate {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// A station as returned by `/locations` and inside checkpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStation {
    pub id: Option<String>,
    pub name: Option<String>,
    pub coordinate: Option<RawCoordinate>,
}

/// Response from `/locations`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLocationsResponse {
    #[serde(default)]
    pub stations: Vec<RawStation>,
}

/// Realtime forecast of a checkpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPrognosis {
    pub platform: Option<String>,
    pub arrival: Option<String>,
    pub departure: Option<String>,
}

/// A call at one station.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCheckpoint {
    pub station: RawStation,
    pub arrival: Option<String>,
    pub departure: Option<String>,
    /// Delay in minutes (absent without realtime data).
    pub delay: Option<i64>,
    pub platform: Option<String>,
    pub prognosis: Option<RawPrognosis>,
}

/// Response from `/connections`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConnectionsResponse {
    #[serde(default)]
    pub connections: Vec<RawConnection>,
}

/// One connection.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConnection {
    #[serde(default)]
    pub sections: Vec<RawSection>,
}

/// One section of a connection: a ride on a vehicle or a walk.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSection {
    pub journey: Option<RawJourney>,
    pub walk: Option<RawWalk>,
    pub departure: RawCheckpoint,
    pub arrival: RawCheckpoint,
}

/// The vehicle ridden in a section.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJourney {
    pub name: Option<String>,
    pub category: Option<String>,
    pub number: Option<String>,
    /// Calls including the section endpoints.
    #[serde(default)]
    pub pass_list: Vec<RawCheckpoint>,
}

/// A walking section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawWalk {
    pub duration: Option<serde_json::Value>,
}

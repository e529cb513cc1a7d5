//! In-memory provider for testing and offline use.
//!
//! Serves a fixed set of locations and trips, either the built-in
//! `test-test` data set or one loaded from a JSON fixture file:
//!
//! ```json
//! {
//!   "locations": [{"name": "Berlin Hbf"}, {"name": "Hamburg Hbf"}],
//!   "trips": [{"status": "normal", "parts": [ ... ]}]
//! }
//! ```
//!
//! Requested times are ignored: the data is static.

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::debug;

use crate::domain::{DomainError, Location, Stop, Trip, TripPart, TripStatus};

use super::{Provider, ProviderError, TripOptions};

/// Name of the built-in data set.
pub const BUILTIN_NAME: &str = "test-test";

/// Name of the file-backed provider.
pub const FIXTURE_NAME: &str = "fixture";

/// On-disk fixture layout.
#[derive(Debug, Deserialize)]
struct FixtureFile {
    locations: Vec<Location>,
    #[serde(default)]
    trips: Vec<Trip>,
}

/// Provider that serves data held in memory.
#[derive(Debug, Clone)]
pub struct StaticProvider {
    name: String,
    locations: Vec<Location>,
    trips: Vec<Trip>,
}

impl StaticProvider {
    /// Create a provider from explicit data.
    pub fn new(name: impl Into<String>, locations: Vec<Location>, trips: Vec<Trip>) -> Self {
        Self {
            name: name.into(),
            locations,
            trips,
        }
    }

    /// The built-in `test-test` data set.
    ///
    /// Two locations, `testloc1` and `testloc2`, and a single trip between
    /// them with one part on the line "at the end of the longest".
    pub fn builtin() -> Result<Self, DomainError> {
        let start = Location::new("testloc1").with_coordinates(15.0, 3.5);
        let end = Location::new("testloc2").with_coordinates(82.0, 2.5);

        let mut from = Stop::new(start.clone());
        from.booked_departure = Some(builtin_time(12, 0));
        let mut to = Stop::new(end.clone());
        to.booked_arrival = Some(builtin_time(12, 30));

        let part = TripPart::new(from, to, "at the end of the longest", Vec::new())?;
        let trip = Trip::new(vec![part], TripStatus::Normal)?;

        Ok(Self::new(BUILTIN_NAME, vec![start, end], vec![trip]))
    }

    /// Load a fixture file.
    ///
    /// Trips are validated while parsing, so a fixture with out-of-order
    /// parts fails to load.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::Fixture(format!("failed to read {path:?}: {e}")))?;

        let fixture: FixtureFile = serde_json::from_str(&json)
            .map_err(|e| ProviderError::Fixture(format!("failed to parse {path:?}: {e}")))?;

        if fixture.locations.is_empty() {
            return Err(ProviderError::Fixture(format!(
                "no locations in {path:?}"
            )));
        }

        debug!(
            ?path,
            locations = fixture.locations.len(),
            trips = fixture.trips.len(),
            "Loaded fixture"
        );

        Ok(Self::new(FIXTURE_NAME, fixture.locations, fixture.trips))
    }

    /// Returns all known locations.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }
}

impl Provider for StaticProvider {
    fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive match in either direction: "Berlin" finds
    /// "Berlin Hbf", and "testloc1 please" finds "testloc1".
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ProviderError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Err(ProviderError::InvalidRequest(
                "location query must not be empty".to_string(),
            ));
        }

        let matches: Vec<Location> = self
            .locations
            .iter()
            .filter(|loc| {
                let name = loc.name.to_lowercase();
                name.contains(&needle) || needle.contains(&name)
            })
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(ProviderError::NoMatch(query.to_string()));
        }

        Ok(matches)
    }

    async fn search_trips(
        &self,
        start: &Location,
        end: &Location,
        _when: NaiveDateTime,
        options: &TripOptions,
    ) -> Result<Vec<Trip>, ProviderError> {
        let limit = options.max_results.map_or(usize::MAX, usize::from);

        Ok(self
            .trips
            .iter()
            .filter(|trip| trip.start().name() == start.name && trip.end().name() == end.name)
            .take(limit)
            .cloned()
            .collect())
    }
}

fn builtin_time(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2014, 1, 1)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}

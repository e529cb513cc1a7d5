//! Location type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A place a provider knows about: a station, stop or address.
///
/// Only the name is guaranteed. The provider id and coordinates are
/// carried through unchanged so the same provider can resolve the
/// location again when searching for trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Human-readable name
    pub name: String,

    /// Provider-specific identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Latitude in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Longitude in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Location {
    /// Create a location known only by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            latitude: None,
            longitude: None,
        }
    }

    /// Attach a provider identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach coordinates.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Returns `(latitude, longitude)` if both are known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_need_both_halves() {
        let mut loc = Location::new("Berlin Hbf").with_coordinates(52.525, 13.369);
        assert_eq!(loc.coordinates(), Some((52.525, 13.369)));

        loc.longitude = None;
        assert_eq!(loc.coordinates(), None);
    }

    #[test]
    fn display_is_name() {
        let loc = Location::new("Hamburg Hbf").with_id("8002549");
        assert_eq!(loc.to_string(), "Hamburg Hbf");
    }

    #[test]
    fn deserializes_name_only() {
        let loc: Location = serde_json::from_str(r#"{"name": "testloc1"}"#).unwrap();
        assert_eq!(loc, Location::new("testloc1"));
    }
}

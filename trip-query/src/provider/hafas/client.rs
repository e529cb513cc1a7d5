//! transport.rest HTTP client.
//!
//! Provides the [`Provider`] operations on top of the public HAFAS REST
//! wrappers: `/locations` for location search and `/journeys` for trip
//! search.

use std::time::Duration;

use chrono::NaiveDateTime;
use tracing::{debug, instrument, warn};

use crate::domain::{Location, Trip};
use crate::provider::http::JsonClient;
use crate::provider::{Provider, ProviderError, TripOptions};

use super::convert::{convert_journeys, convert_locations};
use super::types::{RawJourneysResponse, RawLocation};

/// Base URL of the Deutsche Bahn HAFAS wrapper.
pub const DB_BASE_URL: &str = "https://v6.db.transport.rest";

/// Base URL of the Berlin/Brandenburg (BVG) HAFAS wrapper.
pub const BVG_BASE_URL: &str = "https://v6.bvg.transport.rest";

/// Default number of results per request.
const DEFAULT_MAX_RESULTS: u8 = 5;

/// Time format the API accepts for `departure`/`arrival`.
const QUERY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Configuration for a HAFAS REST provider.
#[derive(Debug, Clone)]
pub struct HafasConfig {
    /// Name the provider is activated under
    pub name: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of candidates/trips to request
    pub max_results: u8,
}

impl HafasConfig {
    /// Create a new config for the given name and base URL.
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            timeout_secs: 10,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Deutsche Bahn (`de-db`).
    pub fn db() -> Self {
        Self::new("de-db", DB_BASE_URL)
    }

    /// Berliner Verkehrsbetriebe (`de-bvg`).
    pub fn bvg() -> Self {
        Self::new("de-bvg", BVG_BASE_URL)
    }

    /// Set a custom base URL (for testing or self-hosted wrappers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set number of results per request.
    pub fn with_max_results(mut self, n: u8) -> Self {
        self.max_results = n;
        self
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// HAFAS provider backed by a transport.rest endpoint.
#[derive(Debug, Clone)]
pub struct HafasProvider {
    http: JsonClient,
    config: HafasConfig,
}

impl HafasProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: HafasConfig) -> Result<Self, ProviderError> {
        let http = JsonClient::new(&config.name, &config.base_url, config.timeout())?;
        Ok(Self { http, config })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &HafasConfig {
        &self.config
    }

    /// Query parameters identifying a location as `from` or `to`.
    fn location_params(
        prefix: &str,
        loc: &Location,
    ) -> Result<Vec<(String, String)>, ProviderError> {
        if let Some(id) = &loc.id {
            return Ok(vec![(prefix.to_string(), id.clone())]);
        }

        let (latitude, longitude) = loc.coordinates().ok_or_else(|| {
            ProviderError::InvalidRequest(format!(
                "location '{}' has neither an id nor coordinates",
                loc.name
            ))
        })?;

        Ok(vec![
            (format!("{prefix}.latitude"), latitude.to_string()),
            (format!("{prefix}.longitude"), longitude.to_string()),
            (format!("{prefix}.address"), loc.name.clone()),
        ])
    }
}

impl Provider for HafasProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    #[instrument(skip(self), fields(provider = %self.config.name))]
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ProviderError> {
        if query.trim().is_empty() {
            return Err(ProviderError::InvalidRequest(
                "location query must not be empty".to_string(),
            ));
        }

        let params = [
            ("query".to_string(), query.to_string()),
            ("results".to_string(), self.config.max_results.to_string()),
            ("stops".to_string(), "true".to_string()),
            ("addresses".to_string(), "false".to_string()),
            ("poi".to_string(), "false".to_string()),
            ("fuzzy".to_string(), "true".to_string()),
        ];

        let raw: Vec<RawLocation> = self.http.get("/locations", &params).await?;
        let locations = convert_locations(raw);

        debug!(count = locations.len(), "Locations found");
        Ok(locations)
    }

    #[instrument(
        skip(self, start, end),
        fields(provider = %self.config.name, from = %start, to = %end)
    )]
    async fn search_trips(
        &self,
        start: &Location,
        end: &Location,
        when: NaiveDateTime,
        options: &TripOptions,
    ) -> Result<Vec<Trip>, ProviderError> {
        let mut params = Self::location_params("from", start)?;
        params.extend(Self::location_params("to", end)?);

        let time_key = if options.by_arrival {
            "arrival"
        } else {
            "departure"
        };
        params.push((time_key.to_string(), when.format(QUERY_TIME_FORMAT).to_string()));

        let results = options.max_results.unwrap_or(self.config.max_results);
        params.push(("results".to_string(), results.to_string()));
        params.push(("stopovers".to_string(), "true".to_string()));

        let raw: RawJourneysResponse = self.http.get("/journeys", &params).await?;
        let trips = convert_journeys(&self.config.name, raw)?;

        if trips.is_empty() {
            warn!("No trips found");
        }

        debug!(count = trips.len(), "Trips found");
        Ok(trips)
    }
}

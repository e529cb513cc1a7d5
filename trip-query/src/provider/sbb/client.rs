//! transport.opendata.ch HTTP client.

use std::time::Duration;

use chrono::NaiveDateTime;
use tracing::{debug, instrument, warn};

use crate::domain::{Location, Trip};
use crate::provider::http::JsonClient;
use crate::provider::{Provider, ProviderError, TripOptions};

use super::convert::{convert_connections, convert_stations};
use super::types::{RawConnectionsResponse, RawLocationsResponse};

/// Base URL of the Swiss public transport API.
pub const SBB_BASE_URL: &str = "https://transport.opendata.ch/v1";

/// The API returns at most this many connections.
const MAX_CONNECTIONS: u8 = 16;

/// Configuration for the transport.opendata.ch provider.
#[derive(Debug, Clone)]
pub struct SbbConfig {
    /// Name the provider is activated under
    pub name: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of connections to request
    pub max_results: u8,
}

impl Default for SbbConfig {
    fn default() -> Self {
        Self {
            name: "ch-sbb".to_string(),
            base_url: SBB_BASE_URL.to_string(),
            timeout_secs: 10,
            max_results: 5,
        }
    }
}

impl SbbConfig {
    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set number of connections per request.
    pub fn with_max_results(mut self, n: u8) -> Self {
        self.max_results = n;
        self
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Provider backed by transport.opendata.ch.
#[derive(Debug, Clone)]
pub struct SbbProvider {
    http: JsonClient,
    config: SbbConfig,
}

impl SbbProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: SbbConfig) -> Result<Self, ProviderError> {
        let http = JsonClient::new(&config.name, &config.base_url, config.timeout())?;
        Ok(Self { http, config })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &SbbConfig {
        &self.config
    }

    /// The API takes a station id or a free-text name.
    fn location_param(loc: &Location) -> String {
        loc.id.clone().unwrap_or_else(|| loc.name.clone())
    }
}

impl Provider for SbbProvider {
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
            ("type".to_string(), "station".to_string()),
        ];

        let raw: RawLocationsResponse = self.http.get("/locations", &params).await?;
        let locations = convert_stations(raw.stations);

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
        let limit = options
            .max_results
            .unwrap_or(self.config.max_results)
            .clamp(1, MAX_CONNECTIONS);

        let params = [
            ("from".to_string(), Self::location_param(start)),
            ("to".to_string(), Self::location_param(end)),
            ("date".to_string(), when.format("%Y-%m-%d").to_string()),
            ("time".to_string(), when.format("%H:%M").to_string()),
            (
                "isArrivalTime".to_string(),
                u8::from(options.by_arrival).to_string(),
            ),
            ("limit".to_string(), limit.to_string()),
        ];

        let raw: RawConnectionsResponse = self.http.get("/connections", &params).await?;
        let trips = convert_connections(&self.config.name, raw)?;

        if trips.is_empty() {
            warn!("No trips found");
        }

        debug!(count = trips.len(), "Trips found");
        Ok(trips)
    }
}

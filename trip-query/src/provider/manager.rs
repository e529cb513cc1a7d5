//! Provider activation by name.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use tracing::info;

use crate::domain::{Location, Trip};

use super::hafas::{HafasConfig, HafasProvider};
use super::sbb::{SbbConfig, SbbProvider};
use super::static_provider::{BUILTIN_NAME, FIXTURE_NAME, StaticProvider};
use super::{Provider, ProviderError, TripOptions};

/// Names accepted by [`ProviderManager::activate`].
const AVAILABLE: &[&str] = &["de-db", "de-bvg", "ch-sbb", BUILTIN_NAME, FIXTURE_NAME];

/// Settings applied to providers when they are activated.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Overrides the base URL of HTTP providers
    pub base_url: Option<String>,
    /// HTTP request timeout in seconds
    pub http_timeout_secs: u64,
    /// Number of candidates/trips to request from HTTP providers
    pub max_results: u8,
    /// Fixture file for the `fixture` provider
    pub fixture_path: Option<PathBuf>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            http_timeout_secs: 10,
            max_results: 5,
            fixture_path: None,
        }
    }
}

impl ProviderSettings {
    /// Override the HTTP base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the fixture file.
    pub fn with_fixture(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixture_path = Some(path.into());
        self
    }

    /// Set the HTTP request timeout.
    pub fn with_http_timeout(mut self, secs: u64) -> Self {
        self.http_timeout_secs = secs;
        self
    }

    fn hafas(&self, preset: HafasConfig) -> HafasConfig {
        let config = preset
            .with_timeout(self.http_timeout_secs)
            .with_max_results(self.max_results);
        match &self.base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }

    fn sbb(&self) -> SbbConfig {
        let config = SbbConfig::default()
            .with_timeout(self.http_timeout_secs)
            .with_max_results(self.max_results);
        match &self.base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }
}

/// Activates providers by name.
#[derive(Debug, Clone, Default)]
pub struct ProviderManager {
    settings: ProviderSettings,
}

impl ProviderManager {
    /// Create a manager with the given settings.
    pub fn new(settings: ProviderSettings) -> Self {
        Self { settings }
    }

    /// Names of all providers that can be activated.
    pub fn available_providers() -> &'static [&'static str] {
        AVAILABLE
    }

    /// Activate the provider registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the name is unknown, the provider lacks required
    /// settings, or its client cannot be built.
    pub fn activate(&self, name: &str) -> Result<ActiveProvider, ProviderError> {
        let provider = match name {
            "de-db" => {
                ActiveProvider::Hafas(HafasProvider::new(self.settings.hafas(HafasConfig::db()))?)
            }
            "de-bvg" => {
                ActiveProvider::Hafas(HafasProvider::new(self.settings.hafas(HafasConfig::bvg()))?)
            }
            "ch-sbb" => ActiveProvider::Sbb(SbbProvider::new(self.settings.sbb())?),
            BUILTIN_NAME => ActiveProvider::Static(
                StaticProvider::builtin().map_err(|e| ProviderError::Fixture(e.to_string()))?,
            ),
            FIXTURE_NAME => {
                let path = self.settings.fixture_path.as_ref().ok_or_else(|| {
                    ProviderError::NotConfigured("fixture provider needs a fixture path".into())
                })?;
                ActiveProvider::Static(StaticProvider::from_path(path)?)
            }
            _ => {
                return Err(ProviderError::UnknownProvider {
                    name: name.to_string(),
                    available: AVAILABLE.join(", "),
                });
            }
        };

        info!(provider = provider.name(), "Loaded provider");
        Ok(provider)
    }
}

/// A provider returned by [`ProviderManager::activate`].
#[derive(Debug, Clone)]
pub enum ActiveProvider {
    /// transport.rest HAFAS backend
    Hafas(HafasProvider),
    /// transport.opendata.ch backend
    Sbb(SbbProvider),
    /// In-memory data
    Static(StaticProvider),
}

impl Provider for ActiveProvider {
    fn name(&self) -> &str {
        match self {
            ActiveProvider::Hafas(p) => p.name(),
            ActiveProvider::Sbb(p) => p.name(),
            ActiveProvider::Static(p) => p.name(),
        }
    }

    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ProviderError> {
        match self {
            ActiveProvider::Hafas(p) => p.search_locations(query).await,
            ActiveProvider::Sbb(p) => p.search_locations(query).await,
            ActiveProvider::Static(p) => p.search_locations(query).await,
        }
    }

    async fn search_trips(
        &self,
        start: &Location,
        end: &Location,
        when: NaiveDateTime,
        options: &TripOptions,
    ) -> Result<Vec<Trip>, ProviderError> {
        match self {
            ActiveProvider::Hafas(p) => p.search_trips(start, end, when, options).await,
            ActiveProvider::Sbb(p) => p.search_trips(start, end, when, options).await,
            ActiveProvider::Static(p) => p.search_trips(start, end, when, options).await,
        }
    }
}

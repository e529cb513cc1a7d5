//! Transit data providers.
//!
//! A provider is a named backend that can resolve free-text location names
//! and search for trips between two locations. The query orchestrator only
//! talks to the [`Provider`] trait; concrete backends are:
//!
//! - [`HafasProvider`] - HAFAS backends behind the transport.rest REST API
//!   (`de-db`, `de-bvg`)
//! - [`SbbProvider`] - Swiss Federal Railways via transport.opendata.ch
//!   (`ch-sbb`)
//! - [`StaticProvider`] - in-memory data, either the built-in `test-test`
//!   set or a JSON fixture file
//!
//! [`ProviderManager`] activates providers by name.

mod convert;
mod error;
mod hafas;
mod http;
mod manager;
mod sbb;
mod static_provider;

use chrono::NaiveDateTime;

use crate::domain::{Location, Trip};

pub use convert::{ConversionError, WALK_LINE};
pub use error::ProviderError;
pub use hafas::{BVG_BASE_URL, DB_BASE_URL, HafasConfig, HafasProvider};
pub use manager::{ActiveProvider, ProviderManager, ProviderSettings};
pub use sbb::{SBB_BASE_URL, SbbConfig, SbbProvider};
pub use static_provider::StaticProvider;

/// Options for a trip search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TripOptions {
    /// Interpret the requested time as the latest arrival instead of the
    /// earliest departure.
    pub by_arrival: bool,

    /// Upper bound on the number of trips, if the provider supports one.
    pub max_results: Option<u8>,
}

impl TripOptions {
    /// Search by arrival time.
    pub fn by_arrival(mut self, by_arrival: bool) -> Self {
        self.by_arrival = by_arrival;
        self
    }

    /// Limit the number of trips.
    pub fn with_max_results(mut self, n: u8) -> Self {
        self.max_results = Some(n);
        self
    }
}

/// Trait for transit data backends.
///
/// Both searches are asynchronous and complete exactly once with either a
/// result or an error. Results are ordered by the provider's ranking,
/// best first.
#[allow(async_fn_in_trait)]
pub trait Provider {
    /// The name this provider was activated under.
    fn name(&self) -> &str;

    /// Resolve free text to candidate locations, best match first.
    ///
    /// May return an empty list when nothing matches.
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>, ProviderError>;

    /// Search for trips from `start` to `end` around `when` (local time).
    ///
    /// An empty list is a valid answer: the backend worked but found
    /// no connection.
    async fn search_trips(
        &self,
        start: &Location,
        end: &Location,
        when: NaiveDateTime,
        options: &TripOptions,
    ) -> Result<Vec<Trip>, ProviderError>;
}

//! Query configuration.

use std::time::Duration;

use crate::provider::TripOptions;

/// Default deadline for a whole query, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Configuration parameters for a trip query.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Deadline covering both location lookups and the trip search.
    pub timeout: Duration,

    /// Options passed to the trip search.
    pub trip_options: TripOptions,
}

impl QueryConfig {
    /// Create a new configuration with the given deadline.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            trip_options: TripOptions::default(),
        }
    }

    /// Set the deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the trip search options.
    pub fn with_trip_options(mut self, options: TripOptions) -> Self {
        self.trip_options = options;
        self
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

//! Trip query state machine.
//!
//! A query resolves the start and end texts to locations, then searches
//! trips between them:
//!
//! ```text
//! Idle -> AwaitingStartLocation -> AwaitingEndLocation -> AwaitingTrips -> Done
//!              |                          |                     |
//!              +--------------------------+---------------------+--> Error(kind)
//! ```
//!
//! One deadline covers all three provider calls. When it fires the pending
//! call is dropped, so a late response has nothing left to report to.
//!
//! Callers that want progress as it happens register a transition
//! observer; it sees every state entered together with the context at
//! that moment.

use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{Location, QueryTime, Trip};
use crate::provider::{Provider, ProviderError};

use super::QueryConfig;

/// Provider call a query was waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStep {
    StartLocation,
    EndLocation,
    Trips,
}

impl fmt::Display for QueryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStep::StartLocation => write!(f, "start location search"),
            QueryStep::EndLocation => write!(f, "end location search"),
            QueryStep::Trips => write!(f, "trip search"),
        }
    }
}

/// Why a query ended in [`QueryState::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A provider call failed or found nothing
    Provider,
    /// The trip search succeeded but returned no trips
    NoTripsFound,
    /// The deadline fired
    TimedOut,
}

/// Current state of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    AwaitingStartLocation,
    AwaitingEndLocation,
    AwaitingTrips,
    Done,
    Error(FailureKind),
}

impl QueryState {
    /// Returns true for `Done` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueryState::Done | QueryState::Error(_))
    }

    /// The provider call pending in this state, if any.
    pub fn pending_step(&self) -> Option<QueryStep> {
        match self {
            QueryState::AwaitingStartLocation => Some(QueryStep::StartLocation),
            QueryState::AwaitingEndLocation => Some(QueryStep::EndLocation),
            QueryState::AwaitingTrips => Some(QueryStep::Trips),
            _ => None,
        }
    }
}

/// Errors that end a query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("{step} failed: {source}")]
    Provider {
        step: QueryStep,
        #[source]
        source: ProviderError,
    },

    #[error("no trips found from {from} to {to}")]
    NoTripsFound { from: String, to: String },

    #[error("query timed out after {}s", after.as_secs())]
    TimedOut { after: Duration },

    #[error("query has already run")]
    AlreadyRun,
}

impl QueryError {
    /// The failure kind recorded in the orchestrator's terminal state.
    ///
    /// `AlreadyRun` never changes the state, so it has none.
    pub fn kind(&self) -> Option<FailureKind> {
        match self {
            QueryError::Provider { .. } => Some(FailureKind::Provider),
            QueryError::NoTripsFound { .. } => Some(FailureKind::NoTripsFound),
            QueryError::TimedOut { .. } => Some(FailureKind::TimedOut),
            QueryError::AlreadyRun => None,
        }
    }
}

/// Inputs of a query and the locations resolved so far.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// Text the start location is searched by
    pub start_text: String,
    /// Text the end location is searched by
    pub end_text: String,
    /// Departure (or arrival) time of the trip search
    pub when: QueryTime,
    /// Resolved start, set on leaving `AwaitingStartLocation`
    pub start: Option<Location>,
    /// Resolved end, set on leaving `AwaitingEndLocation`
    pub end: Option<Location>,
}

impl QueryContext {
    pub fn new(
        start_text: impl Into<String>,
        end_text: impl Into<String>,
        when: QueryTime,
    ) -> Self {
        Self {
            start_text: start_text.into(),
            end_text: end_text.into(),
            when,
            start: None,
            end: None,
        }
    }
}

/// Called with each state the query enters.
pub type TransitionObserver<'a> = Box<dyn FnMut(QueryState, &QueryContext) + Send + 'a>;

/// Drives one trip query against a provider.
///
/// The provider is borrowed, so several orchestrators can share it.
pub struct QueryOrchestrator<'a, P: Provider> {
    provider: &'a P,
    config: &'a QueryConfig,
    context: QueryContext,
    state: QueryState,
    observer: Option<TransitionObserver<'a>>,
}

impl<'a, P: Provider> QueryOrchestrator<'a, P> {
    pub fn new(provider: &'a P, config: &'a QueryConfig, context: QueryContext) -> Self {
        Self {
            provider,
            config,
            context,
            state: QueryState::Idle,
            observer: None,
        }
    }

    /// Observe every transition as it happens.
    ///
    /// The observer runs synchronously inside the query, so it sees
    /// `AwaitingEndLocation` with the start already resolved even if the
    /// deadline fires later.
    pub fn on_transition(
        mut self,
        observer: impl FnMut(QueryState, &QueryContext) + Send + 'a,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    /// Run the query to completion.
    ///
    /// Location lookups take the first candidate the provider returns. An
    /// empty trip list is reported as [`QueryError::NoTripsFound`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if a provider call fails, no trips are found, the
    /// deadline fires, or the orchestrator has left `Idle` already.
    pub async fn run(&mut self) -> Result<Vec<Trip>, QueryError> {
        if self.state != QueryState::Idle {
            return Err(QueryError::AlreadyRun);
        }

        let deadline = self.config.timeout;
        let outcome = tokio::time::timeout(deadline, self.drive()).await;
        let result = match outcome {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    step = ?self.state.pending_step(),
                    timeout_secs = deadline.as_secs(),
                    "Query deadline reached"
                );
                Err(QueryError::TimedOut { after: deadline })
            }
        };

        self.finish(&result);
        result
    }

    async fn drive(&mut self) -> Result<Vec<Trip>, QueryError> {
        let provider = self.provider;

        self.transition(QueryState::AwaitingStartLocation);
        let start = self
            .resolve(QueryStep::StartLocation, &self.context.start_text)
            .await?;
        self.context.start = Some(start.clone());

        self.transition(QueryState::AwaitingEndLocation);
        let end = self
            .resolve(QueryStep::EndLocation, &self.context.end_text)
            .await?;
        self.context.end = Some(end.clone());

        self.transition(QueryState::AwaitingTrips);
        let when = self.context.when.resolve_local();
        debug!(from = %start, to = %end, %when, "Searching trips");

        let trips = provider
            .search_trips(&start, &end, when, &self.config.trip_options)
            .await
            .map_err(|source| QueryError::Provider {
                step: QueryStep::Trips,
                source,
            })?;

        if trips.is_empty() {
            return Err(QueryError::NoTripsFound {
                from: start.name,
                to: end.name,
            });
        }

        Ok(trips)
    }

    /// Look up `text` and take the first candidate.
    async fn resolve(&self, step: QueryStep, text: &str) -> Result<Location, QueryError> {
        let candidates = self
            .provider
            .search_locations(text)
            .await
            .map_err(|source| QueryError::Provider { step, source })?;

        debug!(%step, query = text, candidates = candidates.len(), "Location candidates");

        candidates
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::Provider {
                step,
                source: ProviderError::NoMatch(text.to_string()),
            })
    }

    /// The single terminal transition.
    fn finish(&mut self, result: &Result<Vec<Trip>, QueryError>) {
        let terminal = match result {
            Ok(_) => QueryState::Done,
            Err(e) => match e.kind() {
                Some(kind) => QueryState::Error(kind),
                None => return,
            },
        };
        self.transition(terminal);
    }

    fn transition(&mut self, next: QueryState) {
        if self.state.is_terminal() {
            debug!(state = ?self.state, ignored = ?next, "Query already finished");
            return;
        }
        debug!(from = ?self.state, to = ?next, "Query transition");
        self.state = next;

        if let Some(observer) = self.observer.as_mut() {
            observer(next, &self.context);
        }
    }
}

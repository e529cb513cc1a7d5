//! Trip query orchestration.
//!
//! Resolves two free-text locations through a [`Provider`](crate::provider::Provider)
//! and searches trips between them, all under a single deadline.

mod config;
mod orchestrator;


pub use config::QueryConfig;
pub use orchestrator::{
    FailureKind, QueryContext, QueryError, QueryOrchestrator, QueryState, QueryStep,
    TransitionObserver,
};

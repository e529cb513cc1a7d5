//! Trip query client.
//!
//! Resolves two free-text locations with a named transit provider and
//! lists the trips between them.

pub mod domain;
pub mod format;
pub mod provider;
pub mod query;

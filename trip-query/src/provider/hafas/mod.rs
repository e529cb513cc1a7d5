//! HAFAS provider via the transport.rest API.
//!
//! This module provides an HTTP adapter for the public HAFAS REST
//! wrappers (`v6.db.transport.rest`, `v6.bvg.transport.rest`).
//!
//! Key characteristics of the API:
//! - Locations carry a HAFAS `id` that `/journeys` accepts as `from`/`to`
//! - Times are ISO 8601 with a UTC offset; planned and prognosed times
//!   are separate fields, and delays are `null` without realtime data
//! - `stopovers=true` returns the calls of every leg inline

mod client;
mod convert;
mod types;

pub use client::{BVG_BASE_URL, DB_BASE_URL, HafasConfig, HafasProvider};

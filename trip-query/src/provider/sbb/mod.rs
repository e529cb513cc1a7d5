//! Swiss Federal Railways via the transport.opendata.ch API.
//!
//! Key characteristics of the API:
//! - `/locations?type=station` returns stations with a numeric `id` that
//!   `/connections` accepts as `from`/`to`
//! - Times carry a UTC offset without a colon (`+0100`)
//! - Delays are whole minutes; forecasts live in a `prognosis` object
//! - Each section is either a `journey` on a vehicle or a `walk`

mod client;
mod convert;
mod types;

pub use client::{SBB_BASE_URL, SbbConfig, SbbProvider};

//! Departure board pipeline for the Digitransit stops API.
//!
//! A raw GraphQL response is flattened into [`data::Departure`]s by the
//! [`collector`], then sorted, truncated and formatted into
//! [`data::DisplayRow`]s by the [`ranker`]. Fetching the response, reading the
//! clock and drawing the rows are left to the caller.

use chrono::TimeZone;

pub mod collector;
pub mod config;
pub mod data;
pub mod digitransit;
pub mod error;
pub mod query;
pub mod ranker;
pub mod render;

pub use config::Config;
pub use data::{Departure, DepartureTime, DisplayRow, Timestamp};
pub use error::{CollectError, RowError};

/// Runs one fetch cycle's response through the whole pipeline.
pub fn board<Tz: TimeZone>(
    body: &str,
    now_utc: Timestamp,
    config: &Config,
    tz: &Tz,
) -> Result<Vec<DisplayRow>, CollectError> {
    let departures = collector::collect(body)?;
    Ok(ranker::rank(departures, now_utc, config, tz))
}

//! Wire types for the Digitransit routing API `stops` query.
//!
//! Fields that the absolute departure time depends on are mandatory and fail
//! the decode. Everything a single row needs for display is optional here and
//! checked later, one departure at a time.

use serde::Deserialize;
use serde_json::Value;

use crate::error::CollectError;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StopsResponse {
    pub data: Option<StopsData>,
    pub errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StopsData {
    pub stops: Option<Vec<StopResponse>>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StopResponse {
    pub code: String,
    #[serde(rename = "stoptimesWithoutPatterns")]
    pub stoptimes: Vec<StopTime>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StopTime {
    /// Seconds from the start of the service day. May exceed 86400 for trips
    /// that run past midnight.
    pub realtime_departure: i64,
    /// Epoch seconds of the service day start.
    pub service_day: i64,
    pub realtime: Option<bool>,
    pub headsign: Option<String>,
    pub trip: Option<Trip>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Trip {
    pub route: Option<Route>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub short_name: Option<String>,
    pub mode: Option<String>,
}

impl StopsResponse {
    pub fn decode(body: &str) -> Result<Self, CollectError> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn from_value(value: Value) -> Result<Self, CollectError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Unwraps `data.stops`, turning a missing path into a batch failure.
    pub fn into_stops(self) -> Result<Vec<StopResponse>, CollectError> {
        match self.data.and_then(|data| data.stops) {
            Some(stops) => Ok(stops),
            None => match self.errors {
                Some(errors) if !errors.is_empty() => Err(CollectError::GraphQl(
                    errors.into_iter().map(|error| error.message).collect(),
                )),
                _ => Err(CollectError::MissingStops),
            },
        }
    }
}

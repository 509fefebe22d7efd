//! Request bodies for the stop departures query. Sending them is left to the
//! caller.

use serde_json::{json, Value};

use crate::{config::Config, data::Timestamp};

pub const HSL_ENDPOINT: &str = "https://api.digitransit.fi/routing/v1/routers/hsl/index/graphql";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTimesQuery {
    pub stop_ids: Vec<String>,
    pub start_time: Timestamp,
    pub departures_per_stop: u32,
}

impl StopTimesQuery {
    /// Departures are requested from `request_offset_secs` after `now_utc`.
    pub fn new(config: &Config, now_utc: Timestamp) -> Self {
        Self {
            stop_ids: config.stop_ids.clone(),
            start_time: now_utc.saturating_add(config.request_offset_secs),
            departures_per_stop: config.departures_per_stop,
        }
    }

    /// Body for `Content-Type: application/graphql`.
    pub fn to_graphql(&self) -> String {
        let ids = self
            .stop_ids
            .iter()
            .map(|id| Value::String(id.to_owned()).to_string())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"{{
  stops(ids: [{ids}]) {{
    code
    stoptimesWithoutPatterns(startTime: {start}, numberOfDepartures: {count}) {{
      realtimeDeparture
      serviceDay
      realtime
      headsign
      trip {{
        route {{
          shortName
          mode
        }}
      }}
    }}
  }}
}}"#,
            ids = ids,
            start = self.start_time,
            count = self.departures_per_stop,
        )
    }

    /// Body for `Content-Type: application/json`.
    pub fn to_json_body(&self) -> Value {
        json!({ "query": self.to_graphql() })
    }
}

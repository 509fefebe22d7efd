use thiserror::Error;

/// Failures that invalidate a whole fetch cycle. The caller shows a static
/// message instead of a partial table.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Malformed response: data.stops is missing")]
    MissingStops,

    #[error("GraphQL endpoint reported errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    #[error("Departure time on stop {stop_code:?} overflows: {service_day} + {offset}")]
    TimestampOverflow {
        stop_code: String,
        service_day: i64,
        offset: i64,
    },
}

/// Failures of a single departure. The row is dropped and the batch goes on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("Departure from stop {stop_code:?} has no {field}")]
    MissingField {
        stop_code: String,
        field: &'static str,
    },

    #[error("Departure from stop {stop_code:?} at {timestamp} has no local time")]
    UnrepresentableTime { stop_code: String, timestamp: i64 },
}

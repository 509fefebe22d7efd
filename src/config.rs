pub const DEFAULT_MAX_ROWS: usize = 17;
pub const DEFAULT_NEAR_THRESHOLD_SECS: i64 = 360;
pub const DEFAULT_REQUEST_OFFSET_SECS: i64 = 120;
pub const DEFAULT_DEPARTURES_PER_STOP: u32 = 17;

/// Settings for one board. Built once at startup and handed to every
/// pipeline call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Rows shown across all stops, not per stop.
    pub max_rows: usize,
    /// Departures at most this far from now are shown as a countdown.
    pub near_threshold_secs: i64,
    /// Only read when building the request.
    pub request_offset_secs: i64,
    pub stop_ids: Vec<String>,
    /// Requested per stop; unrelated to `max_rows`.
    pub departures_per_stop: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            near_threshold_secs: DEFAULT_NEAR_THRESHOLD_SECS,
            request_offset_secs: DEFAULT_REQUEST_OFFSET_SECS,
            stop_ids: Vec::default(),
            departures_per_stop: DEFAULT_DEPARTURES_PER_STOP,
        }
    }
}

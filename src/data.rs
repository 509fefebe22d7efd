use std::fmt;

use serde::Serialize;

use crate::digitransit;

/// Epoch seconds, UTC.
pub type Timestamp = i64;

/// A single stoptime tagged with its stop and an absolute departure time.
#[derive(Debug, Clone, PartialEq)]
pub struct Departure {
    pub stop_code: String,
    pub absolute_departure_utc: Timestamp,
    pub realtime: Option<bool>,
    pub headsign: Option<String>,
    pub route: Option<digitransit::Route>,
}

impl Departure {
    pub fn route_short_name(&self) -> Option<&str> {
        self.route.as_ref()?.short_name.as_deref()
    }

    pub fn route_mode(&self) -> Option<&str> {
        self.route.as_ref()?.mode.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DepartureTime {
    /// Local wall clock time.
    Clock { hour: u32, minute: u32 },
    /// Whole minutes between departure and now, shown for near departures.
    Countdown { minutes: i64 },
}

impl DepartureTime {
    pub fn is_near(&self) -> bool {
        matches!(self, DepartureTime::Countdown { .. })
    }
}

impl fmt::Display for DepartureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepartureTime::Clock { hour, minute } => write!(f, "{:02}:{:02}", hour, minute),
            DepartureTime::Countdown { minutes } => write!(f, "{} min", minutes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub stop_code: String,
    pub route: String,
    /// Lowercased route mode, used as a style key.
    pub mode: String,
    pub headsign: String,
    pub time: DepartureTime,
    /// Set when the time comes from the schedule instead of live tracking.
    pub estimated: bool,
    #[serde(skip)]
    pub absolute_departure_utc: Timestamp,
}

impl DisplayRow {
    pub fn estimated_marker(&self) -> &'static str {
        if self.estimated {
            "~"
        } else {
            ""
        }
    }
}

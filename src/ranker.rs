use std::collections::BTreeMap;

use chrono::{TimeZone, Timelike};
use itertools::Itertools;

use crate::{
    config::Config,
    data::{Departure, DepartureTime, DisplayRow, Timestamp},
    error::RowError,
};

/// Sorts departures from all stops into one list and formats the first
/// `config.max_rows` valid ones. Invalid departures are logged and skipped,
/// they never take up a row.
pub fn rank<Tz: TimeZone>(
    departures: Vec<Departure>,
    now_utc: Timestamp,
    config: &Config,
    tz: &Tz,
) -> Vec<DisplayRow> {
    let rows: Vec<DisplayRow> = sorted_rows(departures, now_utc, config, tz)
        .take(config.max_rows)
        .collect();

    log::debug!("Ranked {} rows", rows.len());
    rows
}

/// Like [`rank`], but keeps one list per lowercased route mode, each
/// truncated to `config.max_rows` on its own.
pub fn rank_by_mode<Tz: TimeZone>(
    departures: Vec<Departure>,
    now_utc: Timestamp,
    config: &Config,
    tz: &Tz,
) -> BTreeMap<String, Vec<DisplayRow>> {
    sorted_rows(departures, now_utc, config, tz)
        .map(|row| (row.mode.to_owned(), row))
        .into_group_map()
        .into_iter()
        .map(|(mode, mut rows)| {
            rows.truncate(config.max_rows);
            (mode, rows)
        })
        .collect()
}

fn sorted_rows<'a, Tz: TimeZone>(
    departures: Vec<Departure>,
    now_utc: Timestamp,
    config: &'a Config,
    tz: &'a Tz,
) -> impl Iterator<Item = DisplayRow> + 'a {
    departures
        .into_iter()
        .sorted_by_key(|departure| departure.absolute_departure_utc)
        .filter_map(move |departure| {
            match format_departure(&departure, now_utc, config.near_threshold_secs, tz) {
                Ok(row) => Some(row),
                Err(err) => {
                    log::warn!("Skipping departure: {}", err);
                    None
                }
            }
        })
}

pub fn format_departure<Tz: TimeZone>(
    departure: &Departure,
    now_utc: Timestamp,
    near_threshold_secs: i64,
    tz: &Tz,
) -> Result<DisplayRow, RowError> {
    let missing = |field| RowError::MissingField {
        stop_code: departure.stop_code.to_owned(),
        field,
    };

    let route = departure.route.as_ref().ok_or_else(|| missing("trip.route"))?;
    let short_name = route
        .short_name
        .as_ref()
        .ok_or_else(|| missing("route.shortName"))?;
    let mode = route.mode.as_ref().ok_or_else(|| missing("route.mode"))?;

    let time = departure_time(
        departure.absolute_departure_utc,
        now_utc,
        near_threshold_secs,
        tz,
    )
    .ok_or_else(|| RowError::UnrepresentableTime {
        stop_code: departure.stop_code.to_owned(),
        timestamp: departure.absolute_departure_utc,
    })?;

    Ok(DisplayRow {
        stop_code: departure.stop_code.to_owned(),
        route: short_name.to_owned(),
        mode: mode.to_lowercase(),
        headsign: departure.headsign.clone().unwrap_or_default(),
        time,
        // Only an explicit `false` marks the time as scheduled.
        estimated: departure.realtime == Some(false),
        absolute_departure_utc: departure.absolute_departure_utc,
    })
}

/// Countdown when within `near_threshold_secs` of now on either side,
/// otherwise the local wall clock time.
pub fn departure_time<Tz: TimeZone>(
    departure_utc: Timestamp,
    now_utc: Timestamp,
    near_threshold_secs: i64,
    tz: &Tz,
) -> Option<DepartureTime> {
    let diff = departure_utc.abs_diff(now_utc);

    if u64::try_from(near_threshold_secs).map_or(false, |threshold| diff <= threshold) {
        return Some(DepartureTime::Countdown {
            minutes: (diff / 60) as i64,
        });
    }

    let local = tz.timestamp_opt(departure_utc, 0).single()?;
    Some(DepartureTime::Clock {
        hour: local.hour(),
        minute: local.minute(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digitransit::Route;
    use chrono::{FixedOffset, Utc};

    const SERVICE_DAY: Timestamp = 1700000000;

    fn departure(stop_code: &str, offset: i64, realtime: bool, mode: &str) -> Departure {
        Departure {
            stop_code: stop_code.to_string(),
            absolute_departure_utc: SERVICE_DAY + offset,
            realtime: Some(realtime),
            headsign: Some("Pasila".to_string()),
            route: Some(Route {
                short_name: Some("4".to_string()),
                mode: Some(mode.to_string()),
            }),
        }
    }

    #[test]
    fn test_near_departure_shows_countdown() {
        let now = SERVICE_DAY + 3600 + 200;
        let row = format_departure(&departure("0613", 3600, true, "TRAM"), now, 360, &Utc).unwrap();

        assert_eq!(row.time, DepartureTime::Countdown { minutes: 3 });
        assert!(row.time.is_near());
        assert!(!row.estimated);
    }

    #[test]
    fn test_far_departure_shows_local_clock() {
        // 1700003600 is 2023-11-14 23:13:20 UTC.
        let now = SERVICE_DAY + 3600 - 500;
        let dep = departure("0613", 3600, true, "TRAM");

        let row = format_departure(&dep, now, 360, &Utc).unwrap();
        assert_eq!(row.time, DepartureTime::Clock { hour: 23, minute: 13 });
        assert_eq!(row.time.to_string(), "23:13");

        let helsinki = FixedOffset::east_opt(2 * 3600).unwrap();
        let row = format_departure(&dep, now, 360, &helsinki).unwrap();
        assert_eq!(row.time.to_string(), "01:13");
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let dep = departure("0613", 3600, true, "BUS");
        let row = format_departure(&dep, SERVICE_DAY + 3600 - 360, 360, &Utc).unwrap();
        assert_eq!(row.time, DepartureTime::Countdown { minutes: 6 });

        let row = format_departure(&dep, SERVICE_DAY + 3600 - 361, 360, &Utc).unwrap();
        assert!(!row.time.is_near());
    }

    #[test]
    fn test_estimated_marker_in_both_branches() {
        let dep = departure("0613", 3600, false, "BUS");

        let near = format_departure(&dep, SERVICE_DAY + 3600, 360, &Utc).unwrap();
        assert!(near.estimated);
        assert_eq!(near.estimated_marker(), "~");

        let far = format_departure(&dep, SERVICE_DAY, 360, &Utc).unwrap();
        assert!(far.estimated);
        assert!(!far.time.is_near());
    }

    #[test]
    fn test_mode_is_lowercased() {
        let row = format_departure(&departure("0613", 0, true, "SUBWAY"), SERVICE_DAY, 360, &Utc)
            .unwrap();
        assert_eq!(row.mode, "subway");
    }

    #[test]
    fn test_missing_headsign_and_realtime_keep_row() {
        let mut dep = departure("0613", 3600, true, "TRAM");
        dep.headsign = None;
        dep.realtime = None;

        let row = format_departure(&dep, SERVICE_DAY, 360, &Utc).unwrap();
        assert_eq!(row.headsign, "");
        assert!(!row.estimated);
        assert_eq!(row.estimated_marker(), "");
    }

    #[test]
    fn test_negative_threshold_never_near() {
        assert_eq!(
            departure_time(1000, 1300, -360, &Utc),
            Some(DepartureTime::Clock { hour: 0, minute: 16 })
        );
        assert_eq!(
            departure_time(1000, 1000, -1, &Utc),
            Some(DepartureTime::Clock { hour: 0, minute: 16 })
        );
        assert_eq!(
            departure_time(1000, 1000, 0, &Utc),
            Some(DepartureTime::Countdown { minutes: 0 })
        );
    }

    #[test]
    fn test_missing_route_is_row_error() {
        let mut dep = departure("0613", 0, true, "BUS");
        dep.route = None;

        assert_eq!(
            format_departure(&dep, SERVICE_DAY, 360, &Utc),
            Err(RowError::MissingField {
                stop_code: "0613".to_string(),
                field: "trip.route",
            })
        );
    }

    #[test]
    fn test_rank_sorts_and_truncates() {
        let departures = vec![
            departure("a", 900, true, "BUS"),
            departure("b", 300, true, "TRAM"),
            departure("a", 600, true, "BUS"),
            departure("b", 1200, true, "TRAM"),
        ];
        let config = Config {
            max_rows: 3,
            ..Config::default()
        };

        let rows = rank(departures, SERVICE_DAY, &config, &Utc);

        assert_eq!(
            rows.iter()
                .map(|row| row.absolute_departure_utc - SERVICE_DAY)
                .collect::<Vec<_>>(),
            vec![300, 600, 900]
        );
    }

    #[test]
    fn test_invalid_rows_do_not_take_slots() {
        let mut broken = departure("a", 100, true, "BUS");
        broken.route = None;
        let departures = vec![
            broken,
            departure("a", 200, true, "BUS"),
            departure("a", 300, true, "BUS"),
            departure("a", 400, true, "BUS"),
        ];
        let config = Config {
            max_rows: 3,
            ..Config::default()
        };

        let rows = rank(departures, SERVICE_DAY, &config, &Utc);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].absolute_departure_utc, SERVICE_DAY + 200);
    }

    #[test]
    fn test_rank_by_mode() {
        let departures = vec![
            departure("a", 900, true, "BUS"),
            departure("b", 300, true, "TRAM"),
            departure("a", 600, true, "BUS"),
            departure("a", 100, true, "BUS"),
            departure("b", 1200, true, "TRAM"),
        ];
        let config = Config {
            max_rows: 2,
            ..Config::default()
        };

        let groups = rank_by_mode(departures, SERVICE_DAY, &config, &Utc);

        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["bus", "tram"]);
        assert_eq!(
            groups["bus"]
                .iter()
                .map(|row| row.absolute_departure_utc - SERVICE_DAY)
                .collect::<Vec<_>>(),
            vec![100, 600]
        );
        assert_eq!(groups["tram"].len(), 2);
    }
}

use std::io;

use serde::Serialize;

use crate::{data::DisplayRow, error::CollectError};

/// Shown in place of the table when a fetch cycle fails.
pub const FETCH_FAILED_MESSAGE: &str = "Aikatauluja ei voitu hakea.";

pub fn error_message(err: &CollectError) -> String {
    format!("{}\n{}", FETCH_FAILED_MESSAGE, err)
}

/// One line per row: route, headsign, estimate marker, time. Near rows get a
/// trailing `*`.
pub fn table(rows: &[DisplayRow]) -> String {
    let route_width = rows
        .iter()
        .map(|row| row.route.chars().count())
        .max()
        .unwrap_or(0);
    let headsign_width = rows
        .iter()
        .map(|row| row.headsign.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "{:<route_width$}  {:<headsign_width$}  {:1}{}{}\n",
            row.route,
            row.headsign,
            row.estimated_marker(),
            row.time,
            if row.time.is_near() { " *" } else { "" },
            route_width = route_width,
            headsign_width = headsign_width,
        ));
    }
    out
}

#[derive(Serialize)]
struct CsvRecord<'a> {
    stop: &'a str,
    route: &'a str,
    mode: &'a str,
    headsign: &'a str,
    time: String,
    near: bool,
    estimated: bool,
}

pub fn write_csv<W: io::Write>(rows: &[DisplayRow], writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(CsvRecord {
            stop: &row.stop_code,
            route: &row.route,
            mode: &row.mode,
            headsign: &row.headsign,
            time: row.time.to_string(),
            near: row.time.is_near(),
            estimated: row.estimated,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn json<T: Serialize + ?Sized>(rows: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(rows)
}

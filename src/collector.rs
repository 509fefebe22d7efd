use serde_json::Value;

use crate::{
    data::Departure,
    digitransit::{StopResponse, StopsResponse},
    error::CollectError,
};

/// Decodes a raw response body and flattens it into departures.
pub fn collect(body: &str) -> Result<Vec<Departure>, CollectError> {
    Vec::<Departure>::try_from(StopsResponse::decode(body)?)
}

pub fn collect_value(value: Value) -> Result<Vec<Departure>, CollectError> {
    Vec::<Departure>::try_from(StopsResponse::from_value(value)?)
}

impl TryFrom<StopsResponse> for Vec<Departure> {
    type Error = CollectError;

    fn try_from(response: StopsResponse) -> Result<Self, Self::Error> {
        let stops = response.into_stops()?;

        let mut departures = Vec::new();
        for stop in stops {
            departures.extend(flatten_stop(stop)?);
        }

        log::debug!("Collected {} departures", departures.len());
        Ok(departures)
    }
}

fn flatten_stop(stop: StopResponse) -> Result<Vec<Departure>, CollectError> {
    let StopResponse { code, stoptimes } = stop;

    stoptimes
        .into_iter()
        .map(|stoptime| -> Result<Departure, CollectError> {
            let absolute_departure_utc = stoptime
                .service_day
                .checked_add(stoptime.realtime_departure)
                .ok_or_else(|| CollectError::TimestampOverflow {
                    stop_code: code.to_owned(),
                    service_day: stoptime.service_day,
                    offset: stoptime.realtime_departure,
                })?;

            Ok(Departure {
                stop_code: code.to_owned(),
                absolute_departure_utc,
                realtime: stoptime.realtime,
                headsign: stoptime.headsign,
                route: stoptime.trip.and_then(|trip| trip.route),
            })
        })
        .collect()
}

//! Trail field encoding.
//!
//! A trail is stored as a JSON array of `[latitude, longitude, "YYYY-MM-DDTHH:MM:SSZ"]`
//! triples. Decoding accepts only that exact shape; anything else is rejected.

use thiserror::Error;

use crate::location::LocationPoint;
use crate::time_codec::{self, MalformedTimestamp};

#[derive(Debug, Error)]
pub enum TrailError {
    #[error("trail is not a list of [lat, lon, timestamp] triples: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("point {index}: {source}")]
    Timestamp {
        index: usize,
        source: MalformedTimestamp,
    },
    #[error("point {index}: coordinates must be finite")]
    NonFinite { index: usize },
}

type Triple = (f64, f64, String);

pub fn encode_trail(trail: &[LocationPoint]) -> Result<String, TrailError> {
    let triples = trail
        .iter()
        .enumerate()
        .map(|(index, p)| {
            if !p.latitude.is_finite() || !p.longitude.is_finite() {
                return Err(TrailError::NonFinite { index });
            }
            Ok((p.latitude, p.longitude, time_codec::format_ingest(&p.timestamp)))
        })
        .collect::<Result<Vec<Triple>, _>>()?;

    Ok(serde_json::to_string(&triples)?)
}

pub fn decode_trail(raw: &str) -> Result<Vec<LocationPoint>, TrailError> {
    let triples: Vec<Triple> = serde_json::from_str(raw)?;

    triples
        .into_iter()
        .enumerate()
        .map(|(index, (latitude, longitude, ts))| {
            let timestamp = time_codec::parse_ingest(&ts)
                .map_err(|source| TrailError::Timestamp { index, source })?;
            Ok(LocationPoint {
                latitude,
                longitude,
                timestamp,
            })
        })
        .collect()
}

//! Tabular sample source: `device_fk_id, latitude, longitude, time_stamp, sts`.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::location::{DeviceId, RawSample};

use super::error::IngestError;

#[derive(Debug, Deserialize)]
struct Row {
    device_fk_id: DeviceId,
    latitude: f64,
    longitude: f64,
    time_stamp: String,
    #[serde(default)]
    sts: Option<String>,
}

pub fn load_samples(path: &Path) -> Result<Vec<RawSample>, IngestError> {
    let origin = path.display().to_string();
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| IngestError::Source {
            origin: origin.clone(),
            source,
        })?;
    collect_rows(reader, &origin)
}

pub fn read_samples<R: Read>(input: R) -> Result<Vec<RawSample>, IngestError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    collect_rows(reader, "input")
}

fn collect_rows<R: Read>(
    mut reader: csv::Reader<R>,
    origin: &str,
) -> Result<Vec<RawSample>, IngestError> {
    let rows = reader
        .deserialize::<Row>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|source| IngestError::Source {
            origin: origin.to_string(),
            source,
        })?;

    Ok(order_by_sts(rows)
        .into_iter()
        .map(|row| RawSample {
            device_id: row.device_fk_id,
            latitude: row.latitude,
            longitude: row.longitude,
            timestamp: row.time_stamp,
        })
        .collect())
}

/// Stable-sorts rows by `sts`: numerically when every value is a number,
/// lexically when every row has one, otherwise file order is kept.
fn order_by_sts(mut rows: Vec<Row>) -> Vec<Row> {
    if rows
        .iter()
        .any(|r| r.sts.as_deref().map_or(true, str::is_empty))
    {
        if !rows.is_empty() {
            log::warn!("sts column missing or incomplete, keeping file order");
        }
        return rows;
    }

    let numeric = rows
        .iter()
        .map(|r| r.sts.as_deref()?.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>();

    match numeric {
        Some(keys) => {
            let mut keyed: Vec<(f64, Row)> = keys.into_iter().zip(rows).collect();
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
            keyed.into_iter().map(|(_, row)| row).collect()
        }
        None => {
            rows.sort_by(|a, b| a.sts.cmp(&b.sts));
            rows
        }
    }
}

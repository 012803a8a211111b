use std::sync::Arc;

use crate::location::{Coordinates, DeviceId, DeviceSummary, LocationPoint};
use crate::time_codec;

use super::trail::{decode_trail, encode_trail};
use super::{FieldMap, KeyValueStore, StoreError};

const LATITUDE: &str = "latitude";
const LONGITUDE: &str = "longitude";
const TIME_STAMP: &str = "time_stamp";
const START_LAT: &str = "start_lat";
const START_LON: &str = "start_lon";
const END_LAT: &str = "end_lat";
const END_LON: &str = "end_lon";
const LOCATION_POINTS: &str = "location_points";

/// Reads and writes [`DeviceSummary`] records, one hash per device.
#[derive(Clone)]
pub struct DeviceSummaryStore {
    kv: Arc<dyn KeyValueStore>,
    key_prefix: Option<String>,
}

impl DeviceSummaryStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, key_prefix: Option<String>) -> Self {
        Self { kv, key_prefix }
    }

    pub fn backend_name(&self) -> &str {
        self.kv.backend_name()
    }

    fn key(&self, device_id: DeviceId) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, device_id),
            None => device_id.to_string(),
        }
    }

    pub async fn put(&self, device_id: DeviceId, summary: &DeviceSummary) -> Result<(), StoreError> {
        let key = self.key(device_id);
        let fields = to_fields(&key, summary)?;
        self.kv.put(&key, fields).await
    }

    pub async fn get(&self, device_id: DeviceId) -> Result<DeviceSummary, StoreError> {
        let key = self.key(device_id);
        let fields = self
            .kv
            .get_all_fields(&key)
            .await?
            .ok_or(StoreError::NotFound(device_id))?;
        from_fields(&key, &fields)
    }
}

fn to_fields(key: &str, summary: &DeviceSummary) -> Result<FieldMap, StoreError> {
    let trail = encode_trail(&summary.trail).map_err(|e| corrupt(key, e.to_string()))?;

    // f64 Display is the shortest representation that parses back to the same value.
    let fields = [
        (LATITUDE, summary.latest.latitude.to_string()),
        (LONGITUDE, summary.latest.longitude.to_string()),
        (
            TIME_STAMP,
            time_codec::format_ingest(&summary.latest.timestamp),
        ),
        (START_LAT, summary.start_location.latitude.to_string()),
        (START_LON, summary.start_location.longitude.to_string()),
        (END_LAT, summary.end_location.latitude.to_string()),
        (END_LON, summary.end_location.longitude.to_string()),
        (LOCATION_POINTS, trail),
    ];

    Ok(fields
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect())
}

fn from_fields(key: &str, fields: &FieldMap) -> Result<DeviceSummary, StoreError> {
    let text = |name: &str| {
        fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| corrupt(key, format!("missing field {}", name)))
    };
    let float = |name: &str| -> Result<f64, StoreError> {
        let raw = text(name)?;
        raw.parse::<f64>()
            .map_err(|_| corrupt(key, format!("field {} is not a number: {:?}", name, raw)))
    };

    let latest = LocationPoint {
        latitude: float(LATITUDE)?,
        longitude: float(LONGITUDE)?,
        timestamp: time_codec::parse_ingest(text(TIME_STAMP)?)
            .map_err(|e| corrupt(key, e.to_string()))?,
    };
    let start_location = Coordinates {
        latitude: float(START_LAT)?,
        longitude: float(START_LON)?,
    };
    let end_location = Coordinates {
        latitude: float(END_LAT)?,
        longitude: float(END_LON)?,
    };
    let trail = decode_trail(text(LOCATION_POINTS)?).map_err(|e| corrupt(key, e.to_string()))?;

    Ok(DeviceSummary {
        latest,
        start_location,
        end_location,
        trail,
    })
}

fn corrupt(key: &str, reason: String) -> StoreError {
    StoreError::CorruptRecord {
        key: key.to_string(),
        reason,
    }
}

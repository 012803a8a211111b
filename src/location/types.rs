use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

pub type DeviceId = i64;

/// One row from the ingestion source. The timestamp stays in its raw
/// ingestion-format string until aggregation parses it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub device_id: DeviceId,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: NaiveDateTime,
}

impl LocationPoint {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Precomputed per-device aggregate.
///
/// `trail` is in chronological order; `start_location` is its first point and
/// `end_location` / `latest` its last.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSummary {
    pub latest: LocationPoint,
    pub start_location: Coordinates,
    pub end_location: Coordinates,
    pub trail: Vec<LocationPoint>,
}

impl DeviceSummary {
    /// Builds a summary from an already sorted trail. Returns `None` for an
    /// empty trail since there is no position to report.
    pub fn from_trail(trail: Vec<LocationPoint>) -> Option<Self> {
        let first = *trail.first()?;
        let last = *trail.last()?;
        Some(DeviceSummary {
            latest: last,
            start_location: first.coordinates(),
            end_location: last.coordinates(),
            trail,
        })
    }

    /// Time of the first trail point, falling back to `latest` if the trail
    /// was emptied after construction.
    pub fn started_at(&self) -> NaiveDateTime {
        self.trail
            .first()
            .map_or(self.latest.timestamp, |p| p.timestamp)
    }
}

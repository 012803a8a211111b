use chrono::NaiveDateTime;

use crate::location::{DeviceId, LocationPoint};
use crate::store::DeviceSummaryStore;
use crate::time_codec;

use super::error::QueryError;
use super::types::{LatestInfo, LocationPoints, PointView, StartEndLocations};

/// Read-only queries over stored device summaries.
#[derive(Clone)]
pub struct QueryService {
    store: DeviceSummaryStore,
}

impl QueryService {
    pub fn new(store: DeviceSummaryStore) -> Self {
        Self { store }
    }

    pub async fn latest_info(&self, device_id: DeviceId) -> Result<LatestInfo, QueryError> {
        let summary = self.store.get(device_id).await?;

        Ok(LatestInfo {
            device_id,
            latitude: summary.latest.latitude,
            longitude: summary.latest.longitude,
            timestamp: time_codec::format_display(&summary.latest.timestamp),
        })
    }

    pub async fn start_end(&self, device_id: DeviceId) -> Result<StartEndLocations, QueryError> {
        let summary = self.store.get(device_id).await?;

        Ok(StartEndLocations {
            device_id,
            start_location: summary.start_location,
            end_location: summary.end_location,
        })
    }

    /// Points with `start_time <= timestamp <= end_time`, in trail order.
    ///
    /// Bounds use the display format; an absent bound is as invalid as a
    /// malformed one. The device is looked up before either bound is checked.
    /// An inverted range matches nothing.
    pub async fn points_in_range(
        &self,
        device_id: DeviceId,
        start_time: Option<&str>,
        end_time: Option<&str>,
    ) -> Result<LocationPoints, QueryError> {
        let summary = self.store.get(device_id).await?;

        let start = parse_bound("start_time", start_time)?;
        let end = parse_bound("end_time", end_time)?;

        let location_points = summary
            .trail
            .iter()
            .filter(|p| start <= p.timestamp && p.timestamp <= end)
            .map(point_view)
            .collect();

        Ok(LocationPoints {
            device_id,
            location_points,
        })
    }
}

fn parse_bound(name: &str, value: Option<&str>) -> Result<NaiveDateTime, QueryError> {
    let value =
        value.ok_or_else(|| QueryError::InvalidRange(format!("missing {} parameter", name)))?;
    time_codec::parse_display(value)
        .map_err(|e| QueryError::InvalidRange(format!("{}: {}", name, e)))
}

fn point_view(point: &LocationPoint) -> PointView {
    PointView {
        latitude: point.latitude,
        longitude: point.longitude,
        timestamp: time_codec::format_display(&point.timestamp),
    }
}

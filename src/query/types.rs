use serde::Serialize;
use utoipa::ToSchema;

use crate::location::{Coordinates, DeviceId};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LatestInfo {
    pub device_id: DeviceId,
    pub latitude: f64,
    pub longitude: f64,
    /// `YYYY-MM-DD HH:MM:SS`, UTC
    #[serde(rename = "time_stamp")]
    #[schema(example = "2023-01-01 01:00:00")]
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StartEndLocations {
    pub device_id: DeviceId,
    pub start_location: Coordinates,
    pub end_location: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PointView {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "time_stamp")]
    #[schema(example = "2023-01-01 00:00:00")]
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LocationPoints {
    pub device_id: DeviceId,
    pub location_points: Vec<PointView>,
}

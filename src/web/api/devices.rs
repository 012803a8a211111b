use axum::{
    extract::{rejection::PathRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::location::DeviceId;
use crate::query::{LatestInfo, LocationPoints, StartEndLocations};
use crate::web::api::error::{ApiResult, ErrorResponse};
use crate::web::server::AppState;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[utoipa::path(
    get,
    path = "/latest-info/{device_id}",
    params(
        ("device_id" = i64, Path, description = "Device ID for which to retrieve latest information")
    ),
    responses(
        (status = 200, description = "Success", body = LatestInfo),
        (status = 400, description = "Invalid device ID", body = ErrorResponse),
        (status = 404, description = "Device ID not found", body = ErrorResponse),
        (status = 503, description = "Location cache unavailable", body = ErrorResponse)
    ),
    tag = "devices"
)]
pub async fn latest_info(
    State(state): State<AppState>,
    device_id: Result<Path<DeviceId>, PathRejection>,
) -> ApiResult<Json<LatestInfo>> {
    let Path(device_id) = device_id?;
    Ok(Json(state.queries.latest_info(device_id).await?))
}

#[utoipa::path(
    get,
    path = "/start-end-locations/{device_id}",
    params(
        ("device_id" = i64, Path, description = "Device ID for which to retrieve start and end locations")
    ),
    responses(
        (status = 200, description = "Success", body = StartEndLocations),
        (status = 400, description = "Invalid device ID", body = ErrorResponse),
        (status = 404, description = "Device ID not found", body = ErrorResponse),
        (status = 503, description = "Location cache unavailable", body = ErrorResponse)
    ),
    tag = "devices"
)]
pub async fn start_end_locations(
    State(state): State<AppState>,
    device_id: Result<Path<DeviceId>, PathRejection>,
) -> ApiResult<Json<StartEndLocations>> {
    let Path(device_id) = device_id?;
    Ok(Json(state.queries.start_end(device_id).await?))
}

#[utoipa::path(
    get,
    path = "/location-points/{device_id}",
    params(
        ("device_id" = i64, Path, description = "Device ID for which to retrieve location points"),
        ("start_time" = String, Query, description = "Start time in format yyyy-mm-dd hh:mm:ss"),
        ("end_time" = String, Query, description = "End time in format yyyy-mm-dd hh:mm:ss")
    ),
    responses(
        (status = 200, description = "Success", body = LocationPoints),
        (status = 400, description = "Invalid device ID, or missing or malformed time range", body = ErrorResponse),
        (status = 404, description = "Device ID not found, checked before the time range", body = ErrorResponse),
        (status = 503, description = "Location cache unavailable", body = ErrorResponse)
    ),
    tag = "devices"
)]
pub async fn location_points(
    State(state): State<AppState>,
    device_id: Result<Path<DeviceId>, PathRejection>,
    Query(range): Query<RangeQuery>,
) -> ApiResult<Json<LocationPoints>> {
    let Path(device_id) = device_id?;

    let points = state
        .queries
        .points_in_range(
            device_id,
            range.start_time.as_deref(),
            range.end_time.as_deref(),
        )
        .await?;
    Ok(Json(points))
}

use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use crate::location::Coordinates;
use crate::query::{LatestInfo, LocationPoints, PointView, StartEndLocations};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::api::devices::latest_info,
        super::api::devices::start_end_locations,
        super::api::devices::location_points,
    ),
    components(
        schemas(
            LatestInfo,
            StartEndLocations,
            LocationPoints,
            PointView,
            Coordinates,
            ErrorResponse,
        )
    ),
    info(
        title = "Device Location API",
        description = "APIs to retrieve device location data",
        version = "0.1.0"
    ),
    tags(
        (name = "devices", description = "Device location queries")
    )
)]
pub struct ApiDoc;

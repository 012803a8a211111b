mod error;
mod service;
mod types;

pub use error::QueryError;
pub use service::QueryService;
pub use types::{LatestInfo, LocationPoints, PointView, StartEndLocations};

mod types;

pub use types::{Coordinates, DeviceId, DeviceSummary, LocationPoint, RawSample};

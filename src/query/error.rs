use thiserror::Error;

use crate::location::DeviceId;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("device {0} not found")]
    DeviceNotFound(DeviceId),
    #[error("invalid time range: {0}")]
    InvalidRange(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for QueryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(device_id) => QueryError::DeviceNotFound(device_id),
            _ => QueryError::Store(e),
        }
    }
}

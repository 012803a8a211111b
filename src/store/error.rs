use thiserror::Error;

use crate::location::DeviceId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no summary stored for device {0}")]
    NotFound(DeviceId),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("corrupt record {key}: {reason}")]
    CorruptRecord { key: String, reason: String },
}

use thiserror::Error;

use crate::location::DeviceId;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("ingestion failed for device {device_id}: {reason}")]
    IngestionFailed { device_id: DeviceId, reason: String },
    #[error("cannot read samples from {origin}: {source}")]
    Source { origin: String, source: csv::Error },
    #[error("commit failed after {written} of {total} devices: {source}")]
    Commit {
        written: usize,
        total: usize,
        source: StoreError,
    },
}

use std::collections::BTreeMap;

use crate::location::{DeviceId, DeviceSummary, LocationPoint, RawSample};
use crate::store::DeviceSummaryStore;
use crate::time_codec;

use super::error::IngestError;

pub type Summaries = BTreeMap<DeviceId, DeviceSummary>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    pub devices: usize,
    pub samples: usize,
}

/// Builds device summaries from a batch of samples and writes them out.
pub struct Aggregator {
    store: DeviceSummaryStore,
}

impl Aggregator {
    pub fn new(store: DeviceSummaryStore) -> Self {
        Self { store }
    }

    /// Groups samples per device and orders each group chronologically.
    ///
    /// Equal timestamps keep their input order. Any bad sample fails the
    /// whole batch, so no partial summary is ever produced.
    pub fn ingest(samples: &[RawSample]) -> Result<Summaries, IngestError> {
        let mut groups: BTreeMap<DeviceId, Vec<LocationPoint>> = BTreeMap::new();

        for (row, sample) in samples.iter().enumerate() {
            let fail = |reason: String| IngestError::IngestionFailed {
                device_id: sample.device_id,
                reason: format!("sample {}: {}", row, reason),
            };

            let timestamp =
                time_codec::parse_ingest(&sample.timestamp).map_err(|e| fail(e.to_string()))?;

            if !sample.latitude.is_finite() || !sample.longitude.is_finite() {
                return Err(fail(format!(
                    "non-finite coordinates ({}, {})",
                    sample.latitude, sample.longitude
                )));
            }

            groups.entry(sample.device_id).or_default().push(LocationPoint {
                latitude: sample.latitude,
                longitude: sample.longitude,
                timestamp,
            });
        }

        Ok(groups
            .into_iter()
            .filter_map(|(device_id, mut trail)| {
                trail.sort_by_key(|p| p.timestamp);
                DeviceSummary::from_trail(trail).map(|summary| (device_id, summary))
            })
            .collect())
    }

    /// Writes every summary, replacing whatever was stored for that device.
    ///
    /// Stops at the first failed write. Devices written before it keep their
    /// new summaries, so the cache mixes both batches until the next run.
    pub async fn commit(&self, summaries: &Summaries) -> Result<IngestReport, IngestError> {
        let total = summaries.len();
        let mut samples = 0;
        for (written, (device_id, summary)) in summaries.iter().enumerate() {
            if let Err(source) = self.store.put(*device_id, summary).await {
                log::error!(
                    "Failed to store summary for device {} after {} of {} devices: {}",
                    device_id,
                    written,
                    total,
                    source
                );
                log::error!("Cache now holds a partial batch; re-run ingestion");
                return Err(IngestError::Commit {
                    written,
                    total,
                    source,
                });
            }
            samples += summary.trail.len();
        }

        Ok(IngestReport {
            devices: summaries.len(),
            samples,
        })
    }

    /// One full ingestion run: aggregate everything first, then commit.
    pub async fn run(&self, samples: &[RawSample]) -> Result<IngestReport, IngestError> {
        log::info!(
            "Ingesting {} samples into {} store",
            samples.len(),
            self.store.backend_name()
        );

        let summaries = Self::ingest(samples)?;
        let report = self.commit(&summaries).await?;

        log::info!(
            "Ingestion complete: {} devices, {} samples",
            report.devices,
            report.samples
        );
        Ok(report)
    }
}

//! The per-scrape collection entry point.

use std::sync::Arc;
use std::time::{Duration, Instant};

use fdb_status::{MetricMapper, MetricSample, StatusReader, StatusSource};
use tracing::{debug, error, warn};

use crate::error::Result;

/// Runs one independent read-and-translate cycle per call.
///
/// Holds no per-scrape state, so a single instance serves concurrent scrapes.
pub struct Collector {
    reader: StatusReader<Arc<dyn StatusSource>>,
    mapper: MetricMapper,
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("timeout", &self.reader.timeout())
            .field("mappings", &self.mapper.mappings().len())
            .finish()
    }
}

impl Collector {
    pub fn new(source: Arc<dyn StatusSource>, timeout: Duration) -> Self {
        Self::with_mapper(source, timeout, MetricMapper::default())
    }

    pub fn with_mapper(
        source: Arc<dyn StatusSource>,
        timeout: Duration,
        mapper: MetricMapper,
    ) -> Self {
        Self {
            reader: StatusReader::with_timeout(source, timeout),
            mapper,
        }
    }

    /// Fetch the status document and translate it.
    ///
    /// A failed read never reaches translation.
    pub async fn collect(&self) -> Result<Vec<MetricSample>> {
        let start = Instant::now();

        let raw = self.reader.fetch().await.inspect_err(|e| {
            warn!(error = %e, "Status read failed");
        })?;

        let samples = self.mapper.translate(&raw).inspect_err(|e| {
            error!(error = %e, bytes = raw.len(), "Status document could not be parsed");
        })?;

        debug!(
            samples = samples.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scrape collected"
        );
        Ok(samples)
    }
}

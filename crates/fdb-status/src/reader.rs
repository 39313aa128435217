//! Status document retrieval.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, StatusError};

/// Reserved key holding the cluster status document.
pub const STATUS_KEY: &[u8] = b"\xff\xff/status/json";

/// Default deadline for one status read.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only view of the database key space.
///
/// Implementations perform one logical read per call. Conflict retries are
/// the client's business; callers never loop.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn read(&self, key: &[u8]) -> Result<Vec<u8>>;
}

#[async_trait]
impl<T: StatusSource + ?Sized> StatusSource for Arc<T> {
    async fn read(&self, key: &[u8]) -> Result<Vec<u8>> {
        (**self).read(key).await
    }
}

/// Fetches the raw status document from a [`StatusSource`].
#[derive(Debug)]
pub struct StatusReader<S> {
    source: S,
    timeout: Duration,
}

impl<S: StatusSource> StatusReader<S> {
    pub fn new(source: S) -> Self {
        Self::with_timeout(source, DEFAULT_READ_TIMEOUT)
    }

    pub fn with_timeout(source: S, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Read the status key once.
    ///
    /// A read that fails, exceeds the deadline or returns nothing is reported
    /// as `StatusUnavailable`; no bytes are returned in that case.
    pub async fn fetch(&self) -> Result<Vec<u8>> {
        let bytes = tokio::time::timeout(self.timeout, self.source.read(STATUS_KEY))
            .await
            .map_err(|_| {
                StatusError::unavailable(format!(
                    "status read timed out after {}ms",
                    self.timeout.as_millis()
                ))
            })??;

        if bytes.is_empty() {
            return Err(StatusError::unavailable("status key returned no data"));
        }

        debug!(bytes = bytes.len(), "Fetched status document");
        Ok(bytes)
    }
}

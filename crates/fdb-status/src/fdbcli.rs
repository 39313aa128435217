//! [`StatusSource`] backed by FoundationDB's command-line client.
//!
//! `fdbcli --exec "status json"` reads the reserved status key inside a
//! regular transaction and prints its value, so the exporter does not need
//! to link the native client library.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{Result, StatusError};
use crate::reader::{DEFAULT_READ_TIMEOUT, STATUS_KEY, StatusSource};

/// Runs `fdbcli` once per read. Each call owns its child process, so
/// concurrent reads share nothing.
#[derive(Debug, Clone)]
pub struct FdbCliSource {
    program: PathBuf,
    cluster_file: Option<PathBuf>,
    timeout: Duration,
}

impl Default for FdbCliSource {
    fn default() -> Self {
        Self {
            program: PathBuf::from("fdbcli"),
            cluster_file: None,
            timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

impl FdbCliSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `fdbcli` executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Connect through an explicit cluster file instead of the default lookup.
    pub fn with_cluster_file(mut self, cluster_file: impl Into<PathBuf>) -> Self {
        self.cluster_file = Some(cluster_file.into());
        self
    }

    /// Deadline handed to `fdbcli --timeout`. Rounded up to whole seconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments passed to `fdbcli`.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(6);
        if let Some(cluster_file) = &self.cluster_file {
            args.push("-C".to_string());
            args.push(cluster_file.display().to_string());
        }
        args.push("--timeout".to_string());
        args.push(timeout_secs(self.timeout).to_string());
        args.push("--exec".to_string());
        args.push("status json".to_string());
        args
    }
}

fn timeout_secs(timeout: Duration) -> u64 {
    let secs = timeout.as_secs();
    if timeout.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs.max(1)
    }
}

#[async_trait]
impl StatusSource for FdbCliSource {
    async fn read(&self, key: &[u8]) -> Result<Vec<u8>> {
        if key != STATUS_KEY {
            return Err(StatusError::unavailable(format!(
                "fdbcli can only read the status key, not {:?}",
                String::from_utf8_lossy(key)
            )));
        }

        let mut command = Command::new(&self.program);
        command
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(program = %self.program.display(), "Running fdbcli status json");

        let output = command.output().await.map_err(|e| {
            StatusError::unavailable(format!(
                "failed to run {}: {}",
                self.program.display(),
                e
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            // fdbcli reports connection problems on stdout
            let detail = if stderr.trim().is_empty() {
                stdout.trim()
            } else {
                stderr.trim()
            };
            warn!(
                code = ?output.status.code(),
                detail = %detail,
                "fdbcli exited unsuccessfully"
            );
            return Err(StatusError::unavailable(format!(
                "fdbcli exited with code {:?}: {}",
                output.status.code(),
                detail
            )));
        }

        Ok(output.stdout)
    }
}

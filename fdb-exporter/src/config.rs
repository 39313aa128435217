//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::error::{Error, Result};

/// Default tracing filter directive.
pub const DEFAULT_LOG_FILTER: &str = "fdb_exporter=info,fdb_status=info,tower_http=warn";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Exporter configuration.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Prometheus exporter for FoundationDB cluster status", long_about = None)]
pub struct ExporterConfig {
    /// Port to listen on
    #[arg(short, long, env = "FDB_EXPORTER_PORT", default_value_t = 9444)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "FDB_EXPORTER_BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: String,

    /// FoundationDB cluster file (fdbcli's default lookup when unset)
    #[arg(short = 'C', long, env = "FDB_CLUSTER_FILE")]
    pub cluster_file: Option<PathBuf>,

    /// fdbcli executable used to read the status document
    #[arg(long = "fdbcli", env = "FDB_EXPORTER_FDBCLI", default_value = "fdbcli")]
    pub fdbcli_path: PathBuf,

    /// Deadline for a single status read, in seconds
    #[arg(long, env = "FDB_EXPORTER_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Tracing filter directive
    #[arg(long, env = "RUST_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,

    /// Log output format
    #[arg(long, env = "FDB_EXPORTER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl ExporterConfig {
    /// Reject values that parse but cannot work.
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::config("port must be non-zero"));
        }
        if self.timeout_secs < 2 {
            return Err(Error::config("timeout must be at least two seconds"));
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind_address, self.port)
            .parse()
            .map_err(|e| {
                Error::config(format!(
                    "invalid bind address {}:{}: {}",
                    self.bind_address, self.port, e
                ))
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Deadline handed to fdbcli, one second inside [`timeout`](Self::timeout).
    ///
    /// fdbcli prints its client-side status when it gives up, and that output
    /// must reach the mapper before the outer deadline fires.
    pub fn fdbcli_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.saturating_sub(1).max(1))
    }
}

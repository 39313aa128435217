//! FoundationDB Prometheus exporter.
//!
//! Each scrape of `/metrics` reads the cluster status document once,
//! translates it with [`fdb_status::MetricMapper`] and renders the samples in
//! the Prometheus text format. Nothing is cached between scrapes.

pub mod api;
pub mod collector;
pub mod config;
pub mod error;
pub mod logging;
pub mod prometheus;

pub use collector::Collector;
pub use config::ExporterConfig;
pub use error::{Error, Result};

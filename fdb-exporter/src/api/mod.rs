//! HTTP serving layer.
//!
//! Exposes the collector on `/metrics` and liveness on `/health`.

pub mod error;
pub mod routes;
pub mod server;

pub use server::{ApiServer, AppState};

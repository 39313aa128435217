//! FoundationDB status document to metric translation.
//!
//! # Components
//!
//! - [`StatusReader`]: reads the raw `\xff\xff/status/json` document through an
//!   injectable [`StatusSource`] (for example [`FdbCliSource`]).
//! - [`MetricMapper`]: parses the document and applies the static
//!   [`FIELD_MAPPINGS`] table, producing [`MetricSample`]s in table order.
//!
//! ```text
//! StatusSource ──read(key)──▶ StatusReader::fetch ──bytes──▶ MetricMapper::translate ──▶ Vec<MetricSample>
//! ```
//!
//! An unreadable or unparsable document fails the whole cycle; a missing
//! field only drops its own sample.

mod error;
mod fdbcli;
mod mapper;
mod mapping;
mod reader;

pub use error::{Result, StatusError};
pub use fdbcli::FdbCliSource;
pub use mapper::{MetricMapper, MetricSample};
pub use mapping::{
    Encoding, FIELD_MAPPINGS, FieldMapping, MappingError, MetricKind, validate_mappings,
};
pub use reader::{DEFAULT_READ_TIMEOUT, STATUS_KEY, StatusReader, StatusSource};

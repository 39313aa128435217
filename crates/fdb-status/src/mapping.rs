//! Declarative mapping from status document paths to metrics.
//!
//! Each [`FieldMapping`] names one metric and the key path that feeds it.
//! Adding a metric is a new table entry; traversal and encoding stay generic.

use std::collections::HashSet;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Prometheus metric type of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    /// Instantaneous value that can rise or fall.
    Gauge,
    /// Monotonically non-decreasing total.
    Counter,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a resolved leaf becomes a sample value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Leaf must be a JSON number; used as-is.
    NumericIdentity,
    /// Leaf must be a JSON boolean; `true` is `1.0`, `false` is `0.0`.
    BooleanToZeroOne,
}

impl Encoding {
    /// Encode a leaf, or `None` when its JSON type does not match.
    pub fn encode(&self, leaf: &Value) -> Option<f64> {
        match (self, leaf) {
            (Encoding::NumericIdentity, Value::Number(n)) => n.as_f64(),
            (Encoding::BooleanToZeroOne, Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}

/// One metric derived from one path in the status document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub metric_name: &'static str,
    pub help_text: &'static str,
    pub path: &'static [&'static str],
    pub kind: MetricKind,
    pub encode: Encoding,
}

impl FieldMapping {
    const fn gauge(
        metric_name: &'static str,
        help_text: &'static str,
        path: &'static [&'static str],
    ) -> Self {
        Self {
            metric_name,
            help_text,
            path,
            kind: MetricKind::Gauge,
            encode: Encoding::NumericIdentity,
        }
    }

    const fn counter(
        metric_name: &'static str,
        help_text: &'static str,
        path: &'static [&'static str],
    ) -> Self {
        Self {
            metric_name,
            help_text,
            path,
            kind: MetricKind::Counter,
            encode: Encoding::NumericIdentity,
        }
    }

    const fn flag(
        metric_name: &'static str,
        help_text: &'static str,
        path: &'static [&'static str],
    ) -> Self {
        Self {
            metric_name,
            help_text,
            path,
            kind: MetricKind::Gauge,
            encode: Encoding::BooleanToZeroOne,
        }
    }

    /// Walk `path` through `document`, one key per level.
    ///
    /// Returns `None` when a key is missing or an intermediate node is not an
    /// object. Arrays are never indexed.
    pub fn lookup<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        self.path
            .iter()
            .try_fold(document, |node, key| node.as_object()?.get(*key))
    }

    /// Resolve and encode this mapping's value, `None` meaning "skip".
    pub fn resolve(&self, document: &Value) -> Option<f64> {
        self.encode.encode(self.lookup(document)?)
    }

    /// Dotted form of the path, for logs.
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

/// The canonical mapping table. Order is the output order.
pub static FIELD_MAPPINGS: &[FieldMapping] = &[
    // https://github.com/apple/foundationdb/issues/398
    FieldMapping::gauge(
        "fdb_workload_operations_reads_per_second",
        "Read operations per second",
        &["cluster", "workload", "operations", "reads", "hz"],
    ),
    FieldMapping::gauge(
        "fdb_workload_operations_writes_per_second",
        "Write operations per second",
        &["cluster", "workload", "operations", "writes", "hz"],
    ),
    FieldMapping::counter(
        "fdb_workload_operations_reads_total",
        "Total number of read operations",
        &["cluster", "workload", "operations", "reads", "counter"],
    ),
    FieldMapping::counter(
        "fdb_workload_operations_writes_total",
        "Total number of write operations",
        &["cluster", "workload", "operations", "writes", "counter"],
    ),
    FieldMapping::gauge(
        "fdb_workload_transactions_started_per_second",
        "Started transactions per second",
        &["cluster", "workload", "transactions", "started", "hz"],
    ),
    FieldMapping::gauge(
        "fdb_workload_transactions_committed_per_second",
        "Committed transactions per second",
        &["cluster", "workload", "transactions", "committed", "hz"],
    ),
    FieldMapping::gauge(
        "fdb_workload_transactions_conflicted_per_second",
        "Transaction conflicts per second",
        &["cluster", "workload", "transactions", "conflicted", "hz"],
    ),
    FieldMapping::counter(
        "fdb_workload_transactions_committed_total",
        "Total number of committed transactions",
        &["cluster", "workload", "transactions", "committed", "counter"],
    ),
    FieldMapping::counter(
        "fdb_workload_transactions_conflicted_total",
        "Total number of transaction conflicts",
        &["cluster", "workload", "transactions", "conflicted", "counter"],
    ),
    FieldMapping::counter(
        "fdb_workload_transactions_started_total",
        "Total number of started transactions",
        &["cluster", "workload", "transactions", "started", "counter"],
    ),
    FieldMapping::gauge(
        "fdb_workload_bytes_read_per_second",
        "Bytes read per second",
        &["cluster", "workload", "bytes", "read", "hz"],
    ),
    FieldMapping::gauge(
        "fdb_workload_bytes_written_per_second",
        "Bytes written per second",
        &["cluster", "workload", "bytes", "written", "hz"],
    ),
    FieldMapping::counter(
        "fdb_workload_bytes_read_total",
        "Total number of bytes read",
        &["cluster", "workload", "bytes", "read", "counter"],
    ),
    FieldMapping::counter(
        "fdb_workload_bytes_written_total",
        "Total number of bytes written",
        &["cluster", "workload", "bytes", "written", "counter"],
    ),
    // Only present when the cluster controller ran a latency probe.
    FieldMapping::gauge(
        "fdb_latency_probe_read_seconds",
        "Latency of a probe read in seconds",
        &["cluster", "latency_probe", "read_seconds"],
    ),
    FieldMapping::gauge(
        "fdb_latency_probe_commit_seconds",
        "Latency of a probe commit in seconds",
        &["cluster", "latency_probe", "commit_seconds"],
    ),
    FieldMapping::gauge(
        "fdb_latency_probe_transaction_start_seconds",
        "Latency of a probe transaction start in seconds",
        &["cluster", "latency_probe", "transaction_start_seconds"],
    ),
    FieldMapping::gauge(
        "fdb_data_total_kv_size_bytes",
        "Total logical size of all key-value pairs in bytes",
        &["cluster", "data", "total_kv_size_bytes"],
    ),
    FieldMapping::gauge(
        "fdb_data_total_disk_used_bytes",
        "Total disk space used by the cluster in bytes",
        &["cluster", "data", "total_disk_used_bytes"],
    ),
    FieldMapping::gauge(
        "fdb_data_moving_in_flight_bytes",
        "Bytes of data currently being moved",
        &["cluster", "data", "moving_data", "in_flight_bytes"],
    ),
    FieldMapping::gauge(
        "fdb_data_moving_in_queue_bytes",
        "Bytes of data queued to be moved",
        &["cluster", "data", "moving_data", "in_queue_bytes"],
    ),
    FieldMapping::gauge(
        "fdb_data_partitions_count",
        "Number of data partitions (shards)",
        &["cluster", "data", "partitions_count"],
    ),
    FieldMapping::flag(
        "fdb_data_state_healthy",
        "Whether data distribution reports a healthy state",
        &["cluster", "data", "state", "healthy"],
    ),
    FieldMapping::gauge(
        "fdb_qos_worst_queue_bytes_storage_server",
        "Largest storage server queue in bytes",
        &["cluster", "qos", "worst_queue_bytes_storage_server"],
    ),
    FieldMapping::gauge(
        "fdb_qos_worst_queue_bytes_log_server",
        "Largest log server queue in bytes",
        &["cluster", "qos", "worst_queue_bytes_log_server"],
    ),
    FieldMapping::gauge(
        "fdb_qos_transactions_per_second_limit",
        "Transaction rate limit imposed by ratekeeper",
        &["cluster", "qos", "transactions_per_second_limit"],
    ),
    FieldMapping::gauge(
        "fdb_qos_released_transactions_per_second",
        "Transactions per second released by ratekeeper",
        &["cluster", "qos", "released_transactions_per_second"],
    ),
    FieldMapping::gauge(
        "fdb_clients_count",
        "Number of connected clients",
        &["cluster", "clients", "count"],
    ),
    FieldMapping::gauge(
        "fdb_fault_tolerance_max_zone_failures_without_losing_data",
        "Zone failures the cluster can tolerate without losing data",
        &[
            "cluster",
            "fault_tolerance",
            "max_zone_failures_without_losing_data",
        ],
    ),
    FieldMapping::gauge(
        "fdb_fault_tolerance_max_zone_failures_without_losing_availability",
        "Zone failures the cluster can tolerate without losing availability",
        &[
            "cluster",
            "fault_tolerance",
            "max_zone_failures_without_losing_availability",
        ],
    ),
    FieldMapping::gauge(
        "fdb_cluster_generation",
        "Current recovery generation of the cluster",
        &["cluster", "generation"],
    ),
    FieldMapping::flag(
        "fdb_database_available",
        "Whether the database is available",
        &["cluster", "database_available"],
    ),
    FieldMapping::flag(
        "fdb_database_locked",
        "Whether the database is locked",
        &["cluster", "database_lock_state", "locked"],
    ),
    FieldMapping::flag(
        "fdb_full_replication",
        "Whether all data is fully replicated",
        &["cluster", "full_replication"],
    ),
    FieldMapping::flag(
        "fdb_coordinators_quorum_state",
        "Whether a quorum of coordinators is reachable",
        &["client", "coordinators", "quorum_reachable"],
    ),
    FieldMapping::flag(
        "fdb_client_database_available",
        "Whether the database is available from the client's point of view",
        &["client", "database_status", "available"],
    ),
    FieldMapping::flag(
        "fdb_client_database_healthy",
        "Whether the database is healthy from the client's point of view",
        &["client", "database_status", "healthy"],
    ),
];

/// Table invariant violation found by [`validate_mappings`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("duplicate metric name: {0}")]
    DuplicateName(&'static str),

    #[error("empty path for metric: {0}")]
    EmptyPath(&'static str),

    #[error("invalid metric name: {0}")]
    InvalidName(&'static str),
}

/// Check that names are unique, valid Prometheus names, and paths non-empty.
pub fn validate_mappings(mappings: &[FieldMapping]) -> Result<(), MappingError> {
    let mut seen = HashSet::with_capacity(mappings.len());
    for mapping in mappings {
        if !is_valid_metric_name(mapping.metric_name) {
            return Err(MappingError::InvalidName(mapping.metric_name));
        }
        if mapping.path.is_empty() {
            return Err(MappingError::EmptyPath(mapping.metric_name));
        }
        if !seen.insert(mapping.metric_name) {
            return Err(MappingError::DuplicateName(mapping.metric_name));
        }
    }
    Ok(())
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(name: &'static str) -> &'static FieldMapping {
        FIELD_MAPPINGS
            .iter()
            .find(|m| m.metric_name == name)
            .unwrap()
    }

    #[test]
    fn test_canonical_table_is_valid() {
        assert_eq!(validate_mappings(FIELD_MAPPINGS), Ok(()));
    }

    #[test]
    fn test_canonical_table_keeps_minimal_metrics() {
        for name in [
            "fdb_workload_operations_reads_per_second",
            "fdb_workload_operations_writes_per_second",
            "fdb_workload_operations_writes_total",
            "fdb_workload_transactions_committed_total",
            "fdb_workload_transactions_conflicted_total",
            "fdb_workload_transactions_started_total",
        ] {
            assert!(
                FIELD_MAPPINGS.iter().any(|m| m.metric_name == name),
                "{} missing",
                name
            );
        }
    }

    #[test]
    fn test_counters_end_in_total() {
        for m in FIELD_MAPPINGS.iter().filter(|m| m.kind == MetricKind::Counter) {
            assert!(m.metric_name.ends_with("_total"), "{}", m.metric_name);
        }
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        static TABLE: &[FieldMapping] = &[
            FieldMapping::gauge("a", "a", &["a"]),
            FieldMapping::gauge("a", "b", &["b"]),
        ];
        assert_eq!(
            validate_mappings(TABLE),
            Err(MappingError::DuplicateName("a"))
        );
    }

    #[test]
    fn test_validate_rejects_empty_path() {
        static TABLE: &[FieldMapping] = &[FieldMapping::gauge("a", "a", &[])];
        assert_eq!(validate_mappings(TABLE), Err(MappingError::EmptyPath("a")));
    }

    #[test]
    fn test_validate_rejects_bad_name() {
        static TABLE: &[FieldMapping] = &[FieldMapping::gauge("1fdb-x", "a", &["a"])];
        assert_eq!(
            validate_mappings(TABLE),
            Err(MappingError::InvalidName("1fdb-x"))
        );
    }

    #[test]
    fn test_mapping_error_messages() {
        let err: Box<dyn std::error::Error> = Box::new(MappingError::DuplicateName("fdb_x"));
        assert_eq!(err.to_string(), "duplicate metric name: fdb_x");
        assert_eq!(
            MappingError::EmptyPath("fdb_y").to_string(),
            "empty path for metric: fdb_y"
        );
        assert_eq!(
            MappingError::InvalidName("1fdb").to_string(),
            "invalid metric name: 1fdb"
        );
    }

    #[test]
    fn test_encoding_numeric() {
        assert_eq!(Encoding::NumericIdentity.encode(&json!(42)), Some(42.0));
        assert_eq!(Encoding::NumericIdentity.encode(&json!(-1.5)), Some(-1.5));
        assert_eq!(Encoding::NumericIdentity.encode(&json!("42")), None);
        assert_eq!(Encoding::NumericIdentity.encode(&json!(true)), None);
        assert_eq!(Encoding::NumericIdentity.encode(&json!(null)), None);
    }

    #[test]
    fn test_encoding_boolean() {
        assert_eq!(Encoding::BooleanToZeroOne.encode(&json!(true)), Some(1.0));
        assert_eq!(Encoding::BooleanToZeroOne.encode(&json!(false)), Some(0.0));
        assert_eq!(Encoding::BooleanToZeroOne.encode(&json!(1)), None);
        assert_eq!(Encoding::BooleanToZeroOne.encode(&json!("true")), None);
    }

    #[test]
    fn test_resolve_present_path() {
        let doc = json!({"cluster": {"workload": {"operations": {"reads": {"hz": 123.4}}}}});
        let m = mapping("fdb_workload_operations_reads_per_second");
        assert_eq!(m.resolve(&doc), Some(123.4));
    }

    #[test]
    fn test_resolve_missing_intermediate() {
        let doc = json!({"cluster": {"workload": {}}});
        let m = mapping("fdb_workload_operations_reads_per_second");
        assert_eq!(m.resolve(&doc), None);
    }

    #[test]
    fn test_resolve_non_object_intermediate() {
        let doc = json!({"cluster": {"workload": [1, 2, 3]}});
        let m = mapping("fdb_workload_operations_reads_per_second");
        assert_eq!(m.resolve(&doc), None);
    }

    #[test]
    fn test_resolve_path_past_leaf() {
        let doc = json!({"cluster": {"workload": {"operations": {"reads": 5}}}});
        let m = mapping("fdb_workload_operations_reads_per_second");
        assert_eq!(m.resolve(&doc), None);
    }

    #[test]
    fn test_resolve_root_not_object() {
        let m = mapping("fdb_workload_operations_reads_per_second");
        assert_eq!(m.resolve(&json!([])), None);
        assert_eq!(m.resolve(&json!(1)), None);
    }

    #[test]
    fn test_resolve_leaf_is_subtree() {
        let doc = json!({"client": {"coordinators": {"quorum_reachable": {"x": true}}}});
        let m = mapping("fdb_coordinators_quorum_state");
        assert_eq!(m.resolve(&doc), None);
    }

    #[test]
    fn test_dotted_path() {
        let m = mapping("fdb_coordinators_quorum_state");
        assert_eq!(m.dotted_path(), "client.coordinators.quorum_reachable");
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(MetricKind::Gauge.to_string(), "gauge");
        assert_eq!(MetricKind::Counter.to_string(), "counter");
    }
}

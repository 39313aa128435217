//! Translation of a raw status document into metric samples.

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::mapping::{FIELD_MAPPINGS, FieldMapping, MetricKind};

/// One translated metric value. Produced per scrape, never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub value: f64,
}

/// Applies a mapping table to status documents.
///
/// The mapper is stateless: `translate` is a pure function of its input and
/// the table, so one instance can be shared between concurrent scrapes.
#[derive(Debug, Clone, Copy)]
pub struct MetricMapper {
    mappings: &'static [FieldMapping],
}

impl Default for MetricMapper {
    fn default() -> Self {
        Self::new(FIELD_MAPPINGS)
    }
}

impl MetricMapper {
    pub fn new(mappings: &'static [FieldMapping]) -> Self {
        Self { mappings }
    }

    pub fn mappings(&self) -> &'static [FieldMapping] {
        self.mappings
    }

    /// Parse `raw` and produce one sample per resolvable mapping, in table order.
    ///
    /// Unparsable JSON fails the whole translation with `MalformedStatus`.
    /// Mappings whose path is absent or whose leaf has the wrong type are
    /// skipped.
    pub fn translate(&self, raw: &[u8]) -> Result<Vec<MetricSample>> {
        let document: Value = serde_json::from_slice(raw)?;
        Ok(self.translate_document(&document))
    }

    /// Same as [`translate`](Self::translate) for an already parsed document.
    pub fn translate_document(&self, document: &Value) -> Vec<MetricSample> {
        let mut samples = Vec::with_capacity(self.mappings.len());

        for mapping in self.mappings {
            match mapping.resolve(document) {
                Some(value) => samples.push(MetricSample {
                    name: mapping.metric_name,
                    help: mapping.help_text,
                    kind: mapping.kind,
                    value,
                }),
                None => debug!(
                    metric = mapping.metric_name,
                    path = %mapping.dotted_path(),
                    "Skipping unresolved status field"
                ),
            }
        }

        if samples.len() < self.mappings.len() {
            debug!(
                resolved = samples.len(),
                skipped = self.mappings.len() - samples.len(),
                "Status document missing some mapped fields"
            );
        }

        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StatusError;
    use crate::mapping::Encoding;
    use serde_json::json;

    /// A document that resolves every canonical mapping.
    fn full_document() -> Value {
        let mut doc = json!({});
        for (i, mapping) in FIELD_MAPPINGS.iter().enumerate() {
            let leaf = match mapping.encode {
                Encoding::NumericIdentity => json!(i as f64 + 0.5),
                Encoding::BooleanToZeroOne => json!(i % 2 == 0),
            };
            let (last, parents) = mapping.path.split_last().unwrap();
            let mut node = &mut doc;
            for key in parents {
                node = node
                    .as_object_mut()
                    .unwrap()
                    .entry(*key)
                    .or_insert_with(|| json!({}));
            }
            node.as_object_mut().unwrap().insert(last.to_string(), leaf);
        }
        doc
    }

    fn names(samples: &[MetricSample]) -> Vec<&'static str> {
        samples.iter().map(|s| s.name).collect()
    }

    #[test]
    fn test_full_document_yields_every_mapping_in_order() {
        let raw = serde_json::to_vec(&full_document()).unwrap();
        let samples = MetricMapper::default().translate(&raw).unwrap();

        assert_eq!(samples.len(), FIELD_MAPPINGS.len());
        for (i, (sample, mapping)) in samples.iter().zip(FIELD_MAPPINGS).enumerate() {
            assert_eq!(sample.name, mapping.metric_name);
            assert_eq!(sample.help, mapping.help_text);
            assert_eq!(sample.kind, mapping.kind);
            let expected = match mapping.encode {
                Encoding::NumericIdentity => i as f64 + 0.5,
                Encoding::BooleanToZeroOne => {
                    if i % 2 == 0 {
                        1.0
                    } else {
                        0.0
                    }
                }
            };
            assert_eq!(sample.value, expected, "{}", sample.name);
        }
    }

    #[test]
    fn test_reads_per_second_scenario() {
        let raw = br#"{"cluster":{"workload":{"operations":{"reads":{"hz":123.4}}}}}"#;
        let samples = MetricMapper::default().translate(raw).unwrap();

        assert_eq!(
            samples,
            vec![MetricSample {
                name: "fdb_workload_operations_reads_per_second",
                help: "Read operations per second",
                kind: MetricKind::Gauge,
                value: 123.4,
            }]
        );
    }

    #[test]
    fn test_quorum_reachable_true() {
        let raw = br#"{"client":{"coordinators":{"quorum_reachable": true}}}"#;
        let samples = MetricMapper::default().translate(raw).unwrap();

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].name, "fdb_coordinators_quorum_state");
        assert_eq!(samples[0].kind, MetricKind::Gauge);
        assert_eq!(samples[0].value, 1.0);
    }

    #[test]
    fn test_quorum_reachable_false() {
        let raw = br#"{"client":{"coordinators":{"quorum_reachable": false}}}"#;
        let samples = MetricMapper::default().translate(raw).unwrap();

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].name, "fdb_coordinators_quorum_state");
        assert_eq!(samples[0].value, 0.0);
    }

    #[test]
    fn test_missing_sections_are_omitted() {
        let mut doc = full_document();
        doc["cluster"]
            .as_object_mut()
            .unwrap()
            .remove("latency_probe");
        doc.as_object_mut().unwrap().remove("client");

        let raw = serde_json::to_vec(&doc).unwrap();
        let samples = MetricMapper::default().translate(&raw).unwrap();
        let got = names(&samples);

        let expected: Vec<&str> = FIELD_MAPPINGS
            .iter()
            .filter(|m| m.path[0] != "client" && m.path[1] != "latency_probe")
            .map(|m| m.metric_name)
            .collect();
        assert_eq!(got, expected);
        assert!(!got.contains(&"fdb_coordinators_quorum_state"));
    }

    #[test]
    fn test_wrong_leaf_type_skips_only_that_mapping() {
        let mut doc = full_document();
        doc["cluster"]["workload"]["operations"]["reads"]["hz"] = json!("fast");
        doc["client"]["coordinators"]["quorum_reachable"] = json!(1);

        let raw = serde_json::to_vec(&doc).unwrap();
        let samples = MetricMapper::default().translate(&raw).unwrap();
        let got = names(&samples);

        assert_eq!(got.len(), FIELD_MAPPINGS.len() - 2);
        assert!(!got.contains(&"fdb_workload_operations_reads_per_second"));
        assert!(!got.contains(&"fdb_coordinators_quorum_state"));
        assert!(got.contains(&"fdb_workload_operations_writes_per_second"));
    }

    #[test]
    fn test_empty_object_yields_no_samples() {
        let samples = MetricMapper::default().translate(b"{}").unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_non_object_root_yields_no_samples() {
        let samples = MetricMapper::default().translate(b"[1, 2]").unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_malformed_input_fails() {
        let inputs: [&[u8]; 4] = [b"not json", b"", b"{\"cluster\":", b"\xff\xfe"];
        for raw in inputs {
            let err = MetricMapper::default().translate(raw).unwrap_err();
            assert!(matches!(err, StatusError::MalformedStatus(_)), "{:?}", raw);
        }
    }

    #[test]
    fn test_translate_is_idempotent() {
        let raw = serde_json::to_vec(&full_document()).unwrap();
        let mapper = MetricMapper::default();
        assert_eq!(mapper.translate(&raw).unwrap(), mapper.translate(&raw).unwrap());
    }

    #[test]
    fn test_custom_table() {
        static TABLE: &[FieldMapping] = &[FieldMapping {
            metric_name: "custom_flag",
            help_text: "Custom flag",
            path: &["a", "b"],
            kind: MetricKind::Gauge,
            encode: Encoding::BooleanToZeroOne,
        }];
        let mapper = MetricMapper::new(TABLE);
        let samples = mapper.translate(br#"{"a":{"b":true},"cluster":{}}"#).unwrap();
        assert_eq!(names(&samples), vec!["custom_flag"]);
        assert_eq!(samples[0].value, 1.0);
    }

    #[test]
    fn test_integer_counters_convert_to_float() {
        let raw = br#"{"cluster":{"workload":{"transactions":{"committed":{"counter":9007199254740993}}}}}"#;
        let samples = MetricMapper::default().translate(raw).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].kind, MetricKind::Counter);
        assert!(samples[0].value > 9.0e15);
    }
}

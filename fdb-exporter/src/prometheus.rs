//! Prometheus text exposition rendering.

use std::fmt::Write;

use fdb_status::MetricSample;

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render samples in order, one HELP/TYPE/value block each.
pub fn render(samples: &[MetricSample]) -> String {
    let mut output = String::with_capacity(samples.len() * 128);
    for sample in samples {
        write_sample(&mut output, sample);
    }
    output
}

fn write_sample(output: &mut String, sample: &MetricSample) {
    let _ = writeln!(output, "# HELP {} {}", sample.name, escape_help(sample.help));
    let _ = writeln!(output, "# TYPE {} {}", sample.name, sample.kind);
    let _ = writeln!(output, "{} {}", sample.name, format_value(sample.value));
}

fn escape_help(help: &str) -> String {
    help.replace('\\', "\\\\").replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        value.to_string()
    }
}

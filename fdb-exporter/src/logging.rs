//! Tracing subscriber setup.

use chrono::Local;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::LogFormat;
use crate::error::{Error, Result};

/// Timestamps in the server's local timezone.
#[derive(Debug, Clone, Copy)]
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Build the filter from a directive string.
pub fn build_filter(directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directive)
        .map_err(|e| Error::config(format!("Invalid log filter directive: {}", e)))
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(directive: &str, format: LogFormat) -> Result<()> {
    let filter = build_filter(directive)?;

    let text_layer = (format == LogFormat::Text)
        .then(|| fmt::layer().with_ansi(true).with_timer(LocalTimer));
    let json_layer = (format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_current_span(false)
            .with_timer(LocalTimer)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .try_init()
        .map_err(|e| Error::config(format!("Failed to set global default subscriber: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_default() {
        assert!(build_filter(crate::config::DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_build_filter_rejects_garbage() {
        assert!(matches!(
            build_filter("fdb_exporter=notalevel"),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_local_timer_format() {
        let mut buf = String::new();
        LocalTimer.format_time(&mut Writer::new(&mut buf)).unwrap();
        // 2026-10-15T12:34:56.789+02:00
        assert_eq!(buf.len(), 29, "{}", buf);
        assert_eq!(&buf[10..11], "T");
    }
}

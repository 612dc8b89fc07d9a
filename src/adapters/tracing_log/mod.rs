// Tracing log adapter - Structured logging using tracing crate

use crate::ports::*;

/// Forward one event at a fixed level, with or without structured fields
macro_rules! emit {
    ($macro:ident, $event:expr) => {
        if $event.fields.is_empty() {
            tracing::$macro!("{}", $event.message);
        } else {
            tracing::$macro!(fields = ?$event.fields, "{}", $event.message);
        }
    };
}

/// Tracing log adapter
///
/// Level filtering is left to the installed subscriber, so `RUST_LOG`
/// applies to interactor events too.
#[derive(Debug, Default)]
pub struct TracingLogAdapter;

impl TracingLogAdapter {
    /// Create an adapter over the already-installed subscriber
    pub fn new() -> Self {
        Self
    }
}

impl LogPort for TracingLogAdapter {
    fn log_event(&self, event: &LogEvent) {
        match event.level {
            LogLevel::Error => emit!(error, event),
            LogLevel::Warn => emit!(warn, event),
            LogLevel::Info => emit!(info, event),
            LogLevel::Debug => emit!(debug, event),
            LogLevel::Trace => emit!(trace, event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::EnvFilter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_with_filter(filter: &str, log: impl FnOnce(&TracingLogAdapter)) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || log(&TracingLogAdapter::new()));

        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_subscriber_filter_decides_what_is_kept() {
        let output = capture_with_filter("debug", |adapter| {
            adapter.debug("Getting metadata for part 1: a.mp4");
            adapter.info("Processing folder: A");
        });
        assert!(output.contains("Getting metadata for part 1: a.mp4"));
        assert!(output.contains("Processing folder: A"));

        let output = capture_with_filter("warn", |adapter| {
            adapter.info("Processing folder: A");
            adapter.warn("No video files found");
        });
        assert!(!output.contains("Processing folder: A"));
        assert!(output.contains("No video files found"));
    }

    #[test]
    fn test_structured_fields_are_forwarded() {
        let output = capture_with_filter("info", |adapter| {
            adapter.log_event(
                &LogEvent::new(LogLevel::Error, "Merge failed").with_field("folder", "Trip"),
            );
        });
        assert!(output.contains("Merge failed"));
        assert!(output.contains("Trip"));
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("WARN").unwrap(), LogLevel::Warn);
        assert!(LogLevel::parse("loud").is_err());
    }
}

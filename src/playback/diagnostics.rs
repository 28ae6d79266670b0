/// Diagnostic reporting for contained playback failures
///
/// Whether diagnostics are on is decided by whoever builds the manager;
/// the manager just forwards to whatever it was given.
use std::sync::Arc;

use crate::error::AudioError;

/// Receives contained failures
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, tag: &str, message: &str, error: &AudioError);
}

/// Sink that writes through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, tag: &str, message: &str, error: &AudioError) {
        let mut detail = error.to_string();
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            detail.push_str(": ");
            detail.push_str(&cause.to_string());
            source = std::error::Error::source(cause);
        }
        tracing::warn!(tag, error = %detail, "{}", message);
    }
}

/// Either a sink to report to, or nothing
#[derive(Clone, Default)]
pub struct Diagnostics {
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl Diagnostics {
    pub fn enabled(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink: Some(sink) }
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// Tracing diagnostics in debug builds, silence in release builds
    pub fn for_build() -> Self {
        if cfg!(debug_assertions) {
            Self::enabled(Arc::new(TracingSink))
        } else {
            Self::disabled()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    pub fn report(&self, tag: &str, message: &str, error: &AudioError) {
        if let Some(sink) = &self.sink {
            sink.record(tag, message, error);
        }
    }
}

impl std::fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct CollectingSink {
        records: Mutex<Vec<(String, String)>>,
    }

    impl DiagnosticSink for CollectingSink {
        fn record(&self, tag: &str, message: &str, _error: &AudioError) {
            self.records.lock().push((tag.to_string(), message.to_string()));
        }
    }

    #[test]
    fn test_disabled_drops_reports() {
        let diagnostics = Diagnostics::disabled();
        assert!(!diagnostics.is_enabled());
        diagnostics.report("Tag", "ignored", &AudioError::InvalidResource(0));
    }

    #[test]
    fn test_enabled_forwards_reports() {
        let sink = Arc::new(CollectingSink::default());
        let diagnostics = Diagnostics::enabled(sink.clone());

        diagnostics.report("SoundEffect", "Failed", &AudioError::InvalidResource(0));

        let records = sink.records.lock();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, "SoundEffect");
    }

    #[test]
    fn test_for_build_follows_debug_assertions() {
        assert_eq!(Diagnostics::for_build().is_enabled(), cfg!(debug_assertions));
    }
}

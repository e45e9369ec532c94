use std::sync::Arc;

use snip_core::{EventRecorder, Level, LogEvent, NoopRecorder, Package, Shortener, Validity};

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    base_url: String,
    recorder: Arc<dyn EventRecorder>,
    default_validity: Validity,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, public_base_url: impl Into<String>) -> Self {
        Self {
            shortener,
            base_url: public_base_url.into(),
            recorder: Arc::new(NoopRecorder),
            default_validity: Validity::default(),
        }
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn EventRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    /// Validity applied when a create request leaves it out.
    pub fn with_default_validity(mut self, validity: Validity) -> Self {
        self.default_validity = validity;
        self
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn default_validity(&self) -> Validity {
        self.default_validity
    }

    pub fn log(&self, level: Level, package: Package, message: impl Into<String>) {
        self.recorder
            .record(LogEvent::backend(level, package, message));
    }
}

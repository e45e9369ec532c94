use snip_core::{EventRecorder, Level, LogEvent};
use tracing::{debug, error, info, warn};

/// Writes events to the local `tracing` subscriber.
///
/// Events whose package does not belong to their stack are dropped with a
/// diagnostic instead of being logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRecorder;

impl TracingRecorder {
    /// Validates `event`, emitting a diagnostic and returning `false` when
    /// it is rejected.
    pub(crate) fn accept(event: &LogEvent) -> bool {
        match event.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!(target: "snip::events", error = %e, "rejected log event");
                false
            }
        }
    }

    pub(crate) fn emit(event: &LogEvent) {
        let stack = event.stack.as_str();
        let package = event.package.as_str();
        let message = event.message.as_str();

        match event.level {
            Level::Debug => debug!(target: "snip::events", stack, package, "{message}"),
            Level::Info => info!(target: "snip::events", stack, package, "{message}"),
            Level::Warn => warn!(target: "snip::events", stack, package, "{message}"),
            Level::Error => error!(target: "snip::events", stack, package, "{message}"),
            Level::Fatal => error!(target: "snip::events", stack, package, fatal = true, "{message}"),
        }
    }
}

impl EventRecorder for TracingRecorder {
    fn record(&self, event: LogEvent) {
        if Self::accept(&event) {
            Self::emit(&event);
        }
    }
}

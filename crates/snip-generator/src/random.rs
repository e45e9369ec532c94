use crate::Generator;
use snip_core::{EventRecorder, Level, LogEvent, NoopRecorder, Package, ShortCode};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Number of hex digits kept from the random UUID.
pub const CODE_LENGTH: usize = 8;

/// Generates codes from the leading hex digits of a random v4 UUID.
///
/// Eight hex digits give 2^32 possible codes, which keeps collisions rare
/// for an in-memory store without making links long.
#[derive(Clone)]
pub struct UuidGenerator {
    recorder: Arc<dyn EventRecorder>,
}

impl UuidGenerator {
    pub fn new() -> Self {
        Self::with_recorder(Arc::new(NoopRecorder))
    }

    pub fn with_recorder(recorder: Arc<dyn EventRecorder>) -> Self {
        Self { recorder }
    }
}

impl Default for UuidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UuidGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UuidGenerator").finish_non_exhaustive()
    }
}

impl Generator for UuidGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let mut buf = Uuid::encode_buffer();
        let hex = Uuid::new_v4().simple().encode_lower(&mut buf);
        let code = ShortCode::new_unchecked(&hex[..CODE_LENGTH]);

        debug!(code = %code, "generated short code");
        self.recorder.record(LogEvent::backend(
            Level::Debug,
            Package::Service,
            format!("Generated new shortcode: {code}"),
        ));
        code
    }
}

pub mod random;
pub mod seq;

pub use crate::random::UuidGenerator;
pub use crate::seq::SeqGenerator;

use snip_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage,
/// so a generated code may still collide with one already stored. The
/// mapping service is the one that guarantees uniqueness at insert time.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;
    /// Generates a candidate short code.
    fn generate(&self) -> Self::Output;
}

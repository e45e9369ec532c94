//! URL mapping service.
//!
//! Ties a [`Repository`](snip_core::Repository), a short code
//! [`Generator`](snip_generator::Generator) and a [`Clock`](snip_core::Clock)
//! together into the create / resolve / resolve-and-track use cases.

pub mod service;
pub mod tracker;

pub use service::{MappingService, MappingSettings};
pub use snip_core::ShortenerError;
pub use tracker::ClickTracker;

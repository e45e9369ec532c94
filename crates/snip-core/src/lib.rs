//! Core types and traits for the snip URL shortener.
//!
//! This crate provides the domain model shared by the storage backend,
//! the mapping service and the HTTP gateway: short codes, URL records,
//! click events, expiry rules and the logging capability the core reports
//! through.

pub mod clock;
pub mod error;
pub mod event;
pub mod expiry;
pub mod record;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{EventError, ShortenerError, StorageError};
pub use event::{EventRecorder, Level, LogEvent, NoopRecorder, Package, Stack};
pub use expiry::{ExpiryPolicy, Validity, DEFAULT_VALIDITY_MINUTES};
pub use record::{ClickEvent, UrlRecord, UNKNOWN};
pub use repository::{Lookup, ReadRepository, Repository};
pub use shortcode::ShortCode;
pub use shortener::{CreateParams, Shortener};

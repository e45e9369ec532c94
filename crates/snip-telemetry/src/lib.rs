//! Logging for snip.
//!
//! Two concerns live here: installing the process-wide `tracing`
//! subscriber, and the [`EventRecorder`](snip_core::EventRecorder)
//! implementations the core reports its `(stack, level, package, message)`
//! events through.

pub mod error;
pub mod recorder;
pub mod remote;
pub mod subscriber;

pub use error::TelemetryError;
pub use recorder::TracingRecorder;
pub use remote::{RemoteConfig, RemoteRecorder};
pub use subscriber::{init_tracing, LogFormat};

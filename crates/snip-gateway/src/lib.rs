//! HTTP surface of the snip URL shortener.
//!
//! Routes:
//! - `POST /shorturls` creates a mapping
//! - `GET /shorturls/{shortcode}` returns click statistics
//! - `GET /{shortcode}` records a click and redirects
//! - `GET /health` liveness probe

pub mod app;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;

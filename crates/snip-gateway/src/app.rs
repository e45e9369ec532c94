use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{create_url_handler, health_handler, redirect_handler, stats_handler};
use crate::middleware::log_request;
use crate::state::AppState;

/// First path segments taken by fixed routes. A short code equal to one of
/// these could never be redirected to.
pub const RESERVED_SHORTCODES: &[&str] = &["health", "shorturls"];

pub struct App {}

impl App {
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/shorturls", post(create_url_handler))
            .route("/shorturls/{shortcode}", get(stats_handler))
            .route("/{shortcode}", get(redirect_handler))
            .layer(from_fn_with_state(state.clone(), log_request))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}

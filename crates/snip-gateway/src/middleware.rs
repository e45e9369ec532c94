use crate::state::AppState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use snip_core::{Level, Package};

/// Records every incoming request before it reaches a handler.
pub async fn log_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.log(
        Level::Info,
        Package::Handler,
        format!("Request received: {} {}", request.method(), request.uri().path()),
    );
    next.run(request).await
}

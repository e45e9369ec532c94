mod health;
mod url;

pub use health::HealthResponse;
pub use url::{iso8601, ClickData, CreateUrlRequest, CreateUrlResponse, ErrorResponse, StatsResponse};

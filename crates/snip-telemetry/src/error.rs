use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to install tracing subscriber: {0}")]
    Init(String),
    #[error("failed to build log transport: {0}")]
    Transport(#[from] reqwest::Error),
}

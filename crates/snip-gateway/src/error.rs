use crate::model::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::ShortenerError;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Errors a handler can answer with, each mapped to one status code.
#[derive(Debug)]
pub enum AppError {
    /// The request body could not be read.
    BadRequest(String),
    /// A domain error from the mapping service.
    Shortener(ShortenerError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Shortener(e) => match e {
                ShortenerError::InvalidUrl(_)
                | ShortenerError::InvalidShortCode(_)
                | ShortenerError::InvalidValidity(_) => StatusCode::BAD_REQUEST,
                ShortenerError::Conflict(_) => StatusCode::CONFLICT,
                ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
                ShortenerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::BadRequest(message) => message.clone(),
            AppError::Shortener(e) => match e {
                ShortenerError::InvalidUrl(_) => "Invalid URL format".to_string(),
                ShortenerError::Conflict(_) => "Shortcode collision".to_string(),
                ShortenerError::NotFound(_) => "Non-existent or expired link".to_string(),
                ShortenerError::Storage(_) => "Internal server error".to_string(),
                other => other.to_string(),
            },
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(value: ShortenerError) -> Self {
        AppError::Shortener(value)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = ?self, "request failed");
        }
        let body = ErrorResponse {
            error: self.message(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (ShortenerError::InvalidUrl("x".into()), StatusCode::BAD_REQUEST),
            (ShortenerError::InvalidShortCode("x".into()), StatusCode::BAD_REQUEST),
            (ShortenerError::InvalidValidity("x".into()), StatusCode::BAD_REQUEST),
            (ShortenerError::Conflict("x".into()), StatusCode::CONFLICT),
            (ShortenerError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ShortenerError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(AppError::from(error).status(), status);
        }
    }

    #[test]
    fn public_messages_hide_details() {
        let err = AppError::from(ShortenerError::NotFound("secret-code".into()));
        assert_eq!(err.message(), "Non-existent or expired link");
    }
}

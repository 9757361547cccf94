use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Body returned for every failed watch-provider lookup, whatever the cause.
pub const PROVIDER_LOOKUP_MESSAGE: &str = "Error fetching watch providers";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    MissingParameter(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upstream watch-provider failure. The detail is kept for logs only.
    #[error("Watch provider lookup failed: {0}")]
    ProviderLookup(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::MissingParameter(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ProviderLookup(detail) => {
                tracing::warn!(error = %detail, "Watch provider lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    PROVIDER_LOOKUP_MESSAGE.to_string(),
                )
            }
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

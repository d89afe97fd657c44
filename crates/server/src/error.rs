use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use databank_core::AppError;
use serde_json::json;
use thiserror::Error;

/// Shown to callers once the day's requests are used up.
pub const QUOTA_EXHAUSTED_NOTICE: &str =
    "Today's usage limit has been reached. Please try again tomorrow.";

/// Generic message for backend failures; specifics go in `details`.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Daily quota of {limit} requests exhausted")]
    QuotaExhausted { limit: u32 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal(String),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::QuotaExceeded { limit } => Self::QuotaExhausted { limit },
            AppError::Validation(msg) => Self::Validation(msg),
            AppError::Config(msg) => {
                tracing::error!(error = %msg, "Backend is not configured");
                Self::Config(msg)
            }
            other => {
                tracing::error!(error = %other, "Answer pipeline failed");
                Self::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::QuotaExhausted { limit } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({
                    "error": QUOTA_EXHAUSTED_NOTICE,
                    "allowed": false,
                    "remaining": 0,
                    "limit": limit,
                }),
            ),
            Self::Validation(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            Self::Config(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": message }),
            ),
            Self::Internal(details) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": INTERNAL_ERROR_MESSAGE, "details": details }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_status_code<T: IntoResponse>(response: T, expected_status: StatusCode) {
        let response = response.into_response();
        assert_eq!(response.status(), expected_status);
    }

    #[test]
    fn test_app_error_to_api_error_conversion() {
        let api_error = ApiError::from(AppError::QuotaExceeded { limit: 7 });
        assert_eq!(api_error, ApiError::QuotaExhausted { limit: 7 });

        let api_error = ApiError::from(AppError::Validation("empty".to_string()));
        assert!(matches!(api_error, ApiError::Validation(msg) if msg == "empty"));

        let api_error = ApiError::from(AppError::Config("no key".to_string()));
        assert!(matches!(api_error, ApiError::Config(msg) if msg == "no key"));

        let api_error = ApiError::from(AppError::Generation("timed out".to_string()));
        assert!(matches!(api_error, ApiError::Internal(msg) if msg.contains("timed out")));

        let api_error = ApiError::from(AppError::Classification("reset".to_string()));
        assert!(matches!(api_error, ApiError::Internal(_)));
    }

    #[test]
    fn test_api_error_response_status_codes() {
        assert_status_code(
            ApiError::QuotaExhausted { limit: 1 },
            StatusCode::TOO_MANY_REQUESTS,
        );
        assert_status_code(
            ApiError::Validation("bad".to_string()),
            StatusCode::BAD_REQUEST,
        );
        assert_status_code(
            ApiError::Config("no key".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        );
        assert_status_code(
            ApiError::Internal("boom".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
        );
    }

    #[test]
    fn test_internal_error_display_is_generic() {
        let api_error = ApiError::Internal("upstream said 503".to_string());
        assert_eq!(api_error.to_string(), "Internal server error");
    }
}

//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DatabaseError;
use crate::detection::DetectionError;
use crate::notify::NotifyError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Upstream image fetch failed: {0}")]
    UpstreamFetch(String),
    #[error("Analysis timed out")]
    AnalysisTimeout,
    #[error("Persistence failed: {0}")]
    Persistence(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION",
                detail.clone(),
                None,
            ),
            ApiError::NotFound(detail) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone(), None)
            }
            ApiError::UpstreamFetch(detail) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_FETCH",
                "Failed to fetch the image. Please check the URL and try again.".to_string(),
                Some(detail.clone()),
            ),
            ApiError::AnalysisTimeout => (
                StatusCode::GATEWAY_TIMEOUT,
                "ANALYSIS_TIMEOUT",
                "Analysis timed out. Please retry, ideally with a smaller image.".to_string(),
                None,
            ),
            ApiError::Persistence(detail) => {
                tracing::error!(detail, "scan persistence error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PERSISTENCE",
                    "Failed to save the scan. The analysis result is unaffected; \
                     please retry the save."
                        .to_string(),
                    Some(detail.clone()),
                )
            }
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Failed to process eye health analysis. Please try again or contact \
                     support if the issue persists."
                        .to_string(),
                    Some(detail.clone()),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        ApiError::Persistence(err.to_string())
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError::Persistence(err.to_string())
    }
}

impl From<DetectionError> for ApiError {
    fn from(err: DetectionError) -> Self {
        match err {
            DetectionError::InvalidImageUrl(msg) => ApiError::BadRequest(msg),
            DetectionError::UpstreamFetch(e) => ApiError::UpstreamFetch(e.to_string()),
            DetectionError::Timeout(_) => ApiError::AnalysisTimeout,
        }
    }
}

impl From<NotifyError> for ApiError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::MissingFields | NotifyError::InvalidEmail => {
                ApiError::BadRequest(err.to_string())
            }
            NotifyError::Preferences(e) => ApiError::Persistence(e.to_string()),
            NotifyError::Dispatch(msg) => ApiError::Internal(msg),
        }
    }
}

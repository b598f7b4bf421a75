use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::jobs::JobStoreError;
use crate::tools::ToolError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid API key")]
    Unauthorized,

    #[error("job not found")]
    JobNotFound,

    #[error("no evidence uploaded")]
    NoEvidence,

    #[error("job contains multiple evidence files")]
    MultipleEvidence,

    #[error("invalid evidence filename: {0}")]
    InvalidFilename(String),

    #[error("{0}")]
    BadUpload(String),

    #[error("tool timeout")]
    ToolTimeout,

    #[error("{0} not installed in runtime environment")]
    ToolMissing(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::JobNotFound => StatusCode::NOT_FOUND,
            Self::NoEvidence
            | Self::MultipleEvidence
            | Self::InvalidFilename(_)
            | Self::BadUpload(_) => StatusCode::BAD_REQUEST,
            Self::ToolTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::ToolMissing(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match &self {
            Self::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                // Never echo internal failure details back to the caller.
                "internal error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<JobStoreError> for ApiError {
    fn from(err: JobStoreError) -> Self {
        match err {
            JobStoreError::JobNotFound => Self::JobNotFound,
            JobStoreError::NoEvidence => Self::NoEvidence,
            JobStoreError::MultipleEvidence => Self::MultipleEvidence,
            JobStoreError::InvalidFilename(name) => Self::InvalidFilename(name),
            JobStoreError::Io(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<ToolError> for ApiError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Timeout { .. } => Self::ToolTimeout,
            ToolError::BinaryMissing { binary } => Self::ToolMissing(binary),
            ToolError::Io(e) => Self::Internal(e.to_string()),
        }
    }
}

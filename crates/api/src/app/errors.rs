use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use storepulse_core::DomainError;
use storepulse_infra::LoadError;

/// Everything a handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Domain(e) => json_error(StatusCode::BAD_REQUEST, "validation_error", e.to_string()),
            ApiError::Load(LoadError::Source(e)) => {
                tracing::warn!(error = %e, "record source failed");
                json_error(StatusCode::SERVICE_UNAVAILABLE, "source_unavailable", e.to_string())
            }
            ApiError::Load(e @ LoadError::CachePoisoned) => {
                tracing::error!(error = %e, "snapshot cache unusable");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string())
            }
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

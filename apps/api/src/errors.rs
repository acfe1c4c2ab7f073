use std::sync::OnceLock;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::provider::ProviderError;
use crate::extraction::ExtractError;

/// Whether error responses should carry diagnostic detail.
/// Set once at startup from the configured environment.
static INCLUDE_DETAIL: OnceLock<bool> = OnceLock::new();

pub fn set_debug_responses(enabled: bool) {
    let _ = INCLUDE_DETAIL.set(enabled);
}

fn detail_enabled() -> bool {
    *INCLUDE_DETAIL.get().unwrap_or(&false)
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every response uses the normalized envelope
/// `{status: "fail" | "error", message}`: `fail` for 4xx, `error` for 5xx.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] ProviderError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            // Unique-constraint violations are a caller problem, not a fault.
            AppError::Database(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                StatusCode::CONFLICT
            }
            AppError::Analysis(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message. Server-side faults get a generic message;
    /// the full cause goes to the log instead.
    fn public_message(&self) -> String {
        match self {
            AppError::Database(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                "Duplicate value violates a uniqueness constraint.".to_string()
            }
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ExtractError> for AppError {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::FileMissing => {
                AppError::NotFound("PDF file not found on disk.".to_string())
            }
            ExtractError::Read(e) => {
                AppError::Internal(anyhow::Error::new(e).context("Failed to read uploaded PDF file"))
            }
            ExtractError::Parse(_) => AppError::Unprocessable(
                "Failed to parse PDF. The file may be corrupted, encrypted, or unsupported."
                    .to_string(),
            ),
            ExtractError::InsufficientContent { .. } => AppError::Unprocessable(
                "PDF appears to contain no extractable text. It may be a scanned image-only PDF. \
                 Please upload a text-based PDF."
                    .to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Expected operational outcomes log at warn; anything 5xx is a fault
        // and gets the full diagnostic chain.
        if status.is_server_error() {
            tracing::error!("Unexpected error [{}]: {:?}", status.as_u16(), self);
        } else {
            tracing::warn!("Operational error [{}]: {}", status.as_u16(), self);
        }

        let mut body = json!({
            "status": if status.is_server_error() { "error" } else { "fail" },
            "message": self.public_message(),
        });

        // Diagnostic detail is exposed only in a development configuration.
        if detail_enabled() {
            body["detail"] = json!(format!("{self:?}"));
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_taxonomy() {
        assert_eq!(
            AppError::Validation("bad id".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("missing".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Unprocessable("no text".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::PayloadTooLarge("big".into()).status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_extraction_errors_map_to_http_statuses() {
        assert_eq!(
            AppError::from(ExtractError::FileMissing).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(ExtractError::Parse("bad xref".into())).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::from(ExtractError::InsufficientContent { chars: 10 }).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_server_faults_hide_internals() {
        let err = AppError::Database(sqlx::Error::PoolClosed);
        assert_eq!(err.public_message(), "A database error occurred");
    }
}

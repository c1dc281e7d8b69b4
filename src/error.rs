use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Requested slot is not offered")]
    SlotNotOffered,
    #[error("Requested slot is fully booked")]
    SlotFull,
    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

// 5/517 = SQLite busy, 40001 = PG serialization failure,
// 40P01 = PG deadlock, 55P03 = PG lock not available.
fn is_transient(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::PoolTimedOut => true,
        _ => {
            if let Some(db_err) = e.as_database_error() {
                let code = db_err.code().unwrap_or_default();
                matches!(code.as_ref(), "5" | "517" | "40001" | "40P01" | "55P03")
            } else {
                false
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            AppError::Database(e) => {
                if is_transient(e) {
                    error!("Transient database error: {:?}", e);
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "TRANSIENT",
                        "Storage temporarily unavailable, retry the request".to_string(),
                    )
                } else {
                    error!("Database error: {:?}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL",
                        "Internal server error".to_string(),
                    )
                }
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized".to_string())
            }
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION", msg.clone()),
            AppError::SlotNotOffered => (
                StatusCode::CONFLICT,
                "SLOT_NOT_OFFERED",
                "No active availability rule covers the requested slot".to_string(),
            ),
            AppError::SlotFull => (
                StatusCode::CONFLICT,
                "SLOT_FULL",
                "The requested slot has no remaining capacity".to_string(),
            ),
            AppError::InvalidTransition(msg) => {
                (StatusCode::CONFLICT, "INVALID_TRANSITION", msg.clone())
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "Internal error".to_string(),
            ),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Internal error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "kind": kind,
            "error": message
        }));

        (status, body).into_response()
    }
}

use crate::models::ErrorBody;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Application-level errors
///
/// The storage layer returns these raw; `IntoResponse` below is the only
/// place they turn into status codes and client messages.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("user_id is required")]
    UserIdRequired,

    #[error("invalid user_id: {0:?}")]
    InvalidUserId(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Convert WalletError to HTTP responses
///
/// Input errors are the caller's problem: 400, logged at warn.
/// Anything from storage is ours: 500 with a generic message, details only in the log.
impl IntoResponse for WalletError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            WalletError::InvalidRequest(ref detail) => {
                tracing::warn!(detail = %detail, "Rejected request body");
                (StatusCode::BAD_REQUEST, "invalid request".to_string())
            }

            WalletError::UserIdRequired => {
                tracing::warn!("Missing user id path parameter");
                (StatusCode::BAD_REQUEST, self.to_string())
            }

            WalletError::InvalidUserId(ref raw) => {
                tracing::warn!(raw = %raw, "Non-numeric user id path parameter");
                (StatusCode::BAD_REQUEST, "invalid user_id".to_string())
            }

            WalletError::DatabaseError(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database operation failed".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

/// Helper type for Results in this application
pub type WalletResult<T> = Result<T, WalletError>;

//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and a message that is sent
/// to the client verbatim.
///
/// # Error Categories
///
/// - **Configuration Errors**: No database URL was provided
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Validation Errors**: Bad amount, unknown action, malformed request, insufficient funds
/// - **Resource Errors**: Requested user or route not found
/// - **Method Errors**: HTTP verb not served by the ledger endpoint
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// `DATABASE_URL` is not set.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("Database configuration missing")]
    DatabaseConfigMissing,

    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Amount is missing, unparsable, zero or negative.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid amount")]
    InvalidAmount,

    /// POST `action` is neither `deposit` nor `withdrawal`.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid action")]
    InvalidAction,

    /// Withdrawal amount exceeds the user's balance.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("{0}")]
    InvalidRequest(String),

    /// The user referenced by a POST does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("User not found")]
    UserNotFound,

    /// No route matches the request path.
    #[error("Not found")]
    NotFound,

    /// Returns HTTP 405 Method Not Allowed.
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl AppError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseConfigMissing | AppError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::InvalidAmount
            | AppError::InvalidAction
            | AppError::InsufficientFunds
            | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UserNotFound | AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": "Human-readable error message"
/// }
/// ```
///
/// Database errors are logged with full detail and reported to the client as
/// a generic internal error.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            AppError::Database(err) => {
                tracing::error!(error = %err, "database operation failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::DatabaseConfigMissing, StatusCode::INTERNAL_SERVER_ERROR, "Database configuration missing")]
    #[case(AppError::Database(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")]
    #[case(AppError::InvalidAmount, StatusCode::BAD_REQUEST, "Invalid amount")]
    #[case(AppError::InvalidAction, StatusCode::BAD_REQUEST, "Invalid action")]
    #[case(AppError::InsufficientFunds, StatusCode::BAD_REQUEST, "Insufficient funds")]
    #[case(AppError::InvalidRequest("Invalid user_id".into()), StatusCode::BAD_REQUEST, "Invalid user_id")]
    #[case(AppError::UserNotFound, StatusCode::NOT_FOUND, "User not found")]
    #[case(AppError::MethodNotAllowed, StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")]
    #[tokio::test]
    async fn renders_flat_error_body(
        #[case] error: AppError,
        #[case] expected_status: StatusCode,
        #[case] expected_message: &str,
    ) {
        let response = error.into_response();
        assert_eq!(response.status(), expected_status);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": expected_message }));
    }
}

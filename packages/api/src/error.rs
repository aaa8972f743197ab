// ABOUTME: API error type implementing the error taxonomy at the HTTP boundary
// ABOUTME: Maps layer errors to status codes and a structured error response

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use procura_auth::AuthError;
use procura_core::ValidationError;
use procura_storage::StorageError;

/// Main application error type that all handlers return
#[derive(Debug, Error)]
pub enum ApiError {
    /// Caller is not signed in (or presented an unusable token)
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Username/password exchange failed
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Signed in but lacking the required role
    #[error("Forbidden")]
    Forbidden,

    /// Field-scoped validation failures
    #[error("Validation failed")]
    Validation(BTreeMap<String, String>),

    #[error("Resource not found")]
    NotFound,

    /// Missing or unusable request parameters
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn from_validation(errors: Vec<ValidationError>) -> Self {
        let mut fields = BTreeMap::new();
        for e in errors {
            // first error per field wins, matching one-reason-per-field output
            fields.entry(e.field).or_insert(e.message);
        }
        ApiError::Validation(fields)
    }

    fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::AuthenticationRequired => {
                (StatusCode::UNAUTHORIZED, "AUTHENTICATION_REQUIRED")
            }
            ApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// User-facing message, sanitized for external consumption
    fn to_user_message(&self) -> String {
        match self {
            ApiError::AuthenticationRequired => "Authentication required".to_string(),
            ApiError::InvalidCredentials => {
                "No active account found with the given credentials".to_string()
            }
            ApiError::Forbidden => {
                "You do not have permission to perform this action".to_string()
            }
            ApiError::Validation(_) => "Validation failed".to_string(),
            ApiError::NotFound => "The requested resource was not found".to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound => ApiError::NotFound,
            StorageError::Field { field, message } => {
                let mut fields = BTreeMap::new();
                fields.insert(field, message);
                ApiError::Validation(fields)
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::InvalidToken => ApiError::AuthenticationRequired,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

/// Error detail structure with machine-readable codes
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status, code) = self.to_status_and_code();

        // Log internal errors with full context but don't expose details
        if let ApiError::Internal(detail) = &self {
            error!(
                request_id = %request_id,
                error = %detail,
                "Internal server error occurred"
            );
        }

        let fields = match self {
            ApiError::Validation(ref fields) => Some(fields.clone()),
            _ => None,
        };

        let body = ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_user_message(),
                fields,
            },
            request_id,
        };

        (status, ResponseJson(body)).into_response()
    }
}

//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Every handler in the service returns this type on failure:
/// - [`ErrorCode`] picks the HTTP status and the error family
/// - `message` is shown to the client as-is
/// - `details` carries field names and offending values
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (failing field, constraint, ids)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Attach the name of the failing request field
    pub fn with_field(self, field: &str) -> Self {
        self.with_detail("field", field)
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Path id and body id disagree
    pub fn id_mismatch(path_id: i32, body_id: i32) -> Self {
        Self::new(ErrorCode::IdMismatch)
            .with_detail("path_id", path_id)
            .with_detail("body_id", body_id)
    }

    /// A foreign key in the payload points at a missing row
    pub fn reference_not_found(field: &str, id: i32) -> Self {
        Self::with_message(
            ErrorCode::ReferenceNotFound,
            format!("{} {} does not exist", field, id),
        )
        .with_field(field)
        .with_detail("id", id)
    }

    /// Create an invalid token error
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Create a rate limit error
    pub fn too_many_requests() -> Self {
        Self::new(ErrorCode::TooManyRequests)
    }
}

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Numeric [`ErrorCode`]
    pub code: u16,
    pub message: String,
    /// Failing field, offending values, constraint name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ErrorBody::from(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::NotFound);
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Resource not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_field() {
        let err = AppError::new(ErrorCode::ReservationConflict).with_field("reservation_time");
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "reservation_time");
    }

    #[test]
    fn test_app_error_http_status() {
        assert_eq!(
            AppError::new(ErrorCode::TableNotFound).http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::invalid_credentials().http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::new(ErrorCode::UserLoginExists).http_status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_reference_not_found_names_field() {
        let err = AppError::reference_not_found("table_id", 42);
        assert_eq!(err.code, ErrorCode::ReferenceNotFound);
        assert_eq!(err.message, "table_id 42 does not exist");
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "table_id");
        assert_eq!(details.get("id").unwrap(), 42);
    }

    #[test]
    fn test_id_mismatch_details() {
        let err = AppError::id_mismatch(3, 4);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        let details = err.details.unwrap();
        assert_eq!(details.get("path_id").unwrap(), 3);
        assert_eq!(details.get("body_id").unwrap(), 4);
    }

    #[test]
    fn test_error_body() {
        let err = AppError::new(ErrorCode::RoleInUse).with_detail("role_id", 2);
        let body = ErrorBody::from(&err);

        assert_eq!(body.code, 8103);
        assert_eq!(body.message, "Role is assigned to users");
        assert_eq!(body.details.unwrap()["role_id"], 2);
    }

    #[test]
    fn test_error_body_skips_empty_details() {
        let body = ErrorBody::from(&AppError::new(ErrorCode::OrderEmpty));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 4002);
        assert_eq!(json["message"], "Order must contain at least one item");
        assert!(json.get("details").is_none());
    }
}

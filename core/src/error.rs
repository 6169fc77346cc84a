//! Error types for the library API client.
//!
//! # Design
//! Every failure a caller can see collapses to one human-readable string via
//! [`ApiError::message`]: field errors for validation, the server's `detail`
//! (or a fixed per-operation fallback) for rejected requests, and the
//! transport's own description when the round-trip never completed.

use thiserror::Error;

use crate::schema::ValidationErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more fields failed their schema rules. Never sent to the backend.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// The request could not be completed (connection refused, DNS, TLS...).
    #[error("transport error: {0}")]
    Transport(String),

    /// A success response whose body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The form already has a submission in flight.
    #[error("a submission is already in progress")]
    SubmissionInProgress,
}

impl ApiError {
    /// The single message to show the user.
    pub fn message(&self) -> String {
        match self {
            ApiError::Request { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status for `Request` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

/// Result type alias for client operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_message_is_the_detail() {
        let err = ApiError::Request {
            status: 401,
            message: "Invalid credentials".to_string(),
        };
        assert_eq!(err.message(), "Invalid credentials");
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn validation_errors_convert() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "Title is required");
        let err: ApiError = errors.into();
        assert_eq!(err.message(), "validation failed: title: Title is required");
        assert_eq!(
            err.validation_errors().and_then(|e| e.get("title")),
            Some("Title is required")
        );
    }
}

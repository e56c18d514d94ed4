//! # API Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Split Bill                             │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<String, ApiError>                                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  File missing? ──────── io::Error ──────────────────┐                   │
//! │         │                                           │                   │
//! │         ▼                                           ▼                   │
//! │  Unknown person? ────── CoreError::PersonNotFound ─ ApiError ──► stderr │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Success ─────────────────────────────────────────────────────► stdout  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! With `--format json` the error is printed as
//! `{"code": "NOT_FOUND", "message": "..."}` so scripts can branch on the
//! code.

use serde::Serialize;
use splitbill_core::CoreError;

use crate::state::ConfigError;

/// Error returned from CLI commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown person or item index
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Reading or writing a file failed
    IoError,

    /// Configuration could not be loaded
    ConfigError,

    /// Session document is malformed
    DocumentError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// The code as it appears in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::IoError => "IO_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::DocumentError => "DOCUMENT_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Result alias for command functions.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::PersonNotFound(id) => ApiError::not_found("Person", &id),
            CoreError::ItemNotFound { index, len } => ApiError::new(
                ErrorCode::NotFound,
                format!("Item {} not found (receipt has {} items)", index, len),
            ),
            CoreError::InvalidDocument(e) => ApiError::new(
                ErrorCode::DocumentError,
                format!("Invalid session document: {}", e),
            ),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::new(ErrorCode::IoError, err.to_string())
    }
}

/// Output serialisation failures. Session documents go through
/// [`CoreError::InvalidDocument`] instead.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Failed to serialise output: {}", err);
        ApiError::internal("Failed to serialise output")
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use splitbill_core::ValidationError;

    #[test]
    fn test_person_not_found_maps_to_not_found() {
        let err: ApiError = CoreError::PersonNotFound("abc".into()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Person not found: abc");
    }

    #[test]
    fn test_item_not_found_keeps_message() {
        let err: ApiError = CoreError::ItemNotFound { index: 4, len: 2 }.into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Item 4 not found (receipt has 2 items)");
    }

    #[test]
    fn test_validation_error_code() {
        let core = CoreError::Validation(ValidationError::TooLong {
            field: "person name".into(),
            max: 50,
        });
        let err: ApiError = core.into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_invalid_document_code() {
        let json_err = serde_json::from_str::<u8>("[").unwrap_err();
        let err: ApiError = CoreError::InvalidDocument(json_err).into();
        assert_eq!(err.code, ErrorCode::DocumentError);
    }

    #[test]
    fn test_serialized_shape() {
        let err = ApiError::not_found("Person", "x");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Person not found: x");
        assert_eq!(err.to_string(), "[NOT_FOUND] Person not found: x");
    }
}

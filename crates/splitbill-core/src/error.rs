//! # Error Types
//!
//! Domain-specific error types for splitbill-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  splitbill-core errors (this file)                                     │
//! │  ├── CoreError        - Session lookups, malformed documents           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError         - What the user sees (code + message)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → stderr / JSON          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! The parser and the allocation arithmetic never fail:
//! - an unparseable receipt line is dropped
//! - an over-allocating claim is clamped
//! - a zero denominator yields zero
//!
//! Errors only exist where a caller names something that is not there.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No person with this id exists in the session.
    ///
    /// ## When This Occurs
    /// - The person was removed before a queued claim update arrived
    /// - A stale id was typed on the command line
    #[error("Person not found: {0}")]
    PersonNotFound(String),

    /// The item index is outside the receipt's item list.
    #[error("Item {index} not found (receipt has {len} items)")]
    ItemNotFound { index: usize, len: usize },

    /// A session document could not be read.
    #[error("Invalid session document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Free-form numeric input is never a validation error: it is coerced to
/// zero instead (see [`crate::validation::coerce_amount`]).
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ItemNotFound { index: 7, len: 3 };
        assert_eq!(err.to_string(), "Item 7 not found (receipt has 3 items)");

        let err = CoreError::PersonNotFound("abc".to_string());
        assert_eq!(err.to_string(), "Person not found: abc");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::TooLong {
            field: "name".to_string(),
            max: 50,
        };
        assert_eq!(err.to_string(), "name must be at most 50 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::InvalidFormat {
            field: "name".to_string(),
            reason: "contains a line break".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_json_error_converts_to_core_error() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let core_err: CoreError = json_err.into();
        assert!(matches!(core_err, CoreError::InvalidDocument(_)));
    }
}

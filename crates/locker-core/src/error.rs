//! # Error Types
//!
//! Domain-specific error types for locker-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  locker-core errors (this file)                                        │
//! │  ├── CoreError        - Access gate errors (session, credentials)      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  locker-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  locker-api errors                                                     │
//! │  └── ApiError         - What HTTP callers see ({code, message})        │
//! │                                                                         │
//! │  Flow: ValidationError → DbError ─┐                                    │
//! │        CoreError ─────────────────┴──► ApiError → Caller               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Access gate errors.
///
/// Lookups and uniqueness are the store's concern and surface as `DbError`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No valid session accompanies the request.
    #[error("Login required")]
    Unauthenticated,

    /// Bad credentials.
    ///
    /// The message is identical for an unknown username and a wrong
    /// password.
    #[error("Invalid username or password")]
    AuthFailed,

    /// The session is valid but lacks the capability.
    ///
    /// ## When This Occurs
    /// - Non-admin calling an admin-gated operation
    /// - Admin trying to delete their own account
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any state is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, bad barcode characters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(CoreError::Unauthenticated.to_string(), "Login required");

        let err = CoreError::PermissionDenied("DELETE /users/u1".to_string());
        assert_eq!(err.to_string(), "Permission denied: DELETE /users/u1");
    }

    #[test]
    fn test_auth_failure_hides_cause() {
        assert_eq!(
            CoreError::AuthFailed.to_string(),
            "Invalid username or password"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Negative {
            field: "stock".to_string(),
        };
        assert_eq!(err.to_string(), "stock cannot be negative");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        };
        assert_eq!(err.to_string(), "password must be at least 8 characters");
    }
}

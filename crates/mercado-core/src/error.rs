//! # Error Types
//!
//! Domain-specific error types for mercado-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  mercado-core errors (this file)                                        │
//! │  ├── CoreError        - Ledger rule violations                          │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  mercado-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  HTTP errors (in apps/mercado-server)                                   │
//! │  └── ApiError         - What the client sees (serialized)               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Ledger rule violations.
///
/// These are raised deliberately, either before a mutation starts or from
/// inside a unit of work (which is then rolled back).
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product with this code exists.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A decrement asked for more than the product has.
    ///
    /// ## User Workflow
    /// ```text
    /// Decrement batch [{A001, 4}, {A001, 7}], stock = 10
    ///      │
    ///      ▼
    /// A001: 10 → 6 (inside the transaction)
    ///      │
    ///      ▼
    /// A001: 6 < 7
    ///      │
    ///      ▼
    /// InsufficientStock { code: "A001", available: 6, requested: 7 }
    ///      │
    ///      ▼
    /// Rollback: A001 is 10 again
    /// ```
    #[error("Insufficient stock for {code}: available {available}, requested {requested}")]
    InsufficientStock {
        code: String,
        available: i64,
        requested: i64,
    },

    /// A batch operation received no items.
    #[error("{what} must contain at least one item")]
    EmptyBatch { what: String },

    /// An aggregate does not fit in i64 cents.
    #[error("{what} is too large to compute")]
    AmountOverflow { what: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation before any mutation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value is above the allowed maximum.
    #[error("{field} must be at most {max}")]
    TooLarge { field: String, max: String },

    /// Invalid format (e.g., malformed date, non-finite amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Shorthand for a missing field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
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
        let err = CoreError::InsufficientStock {
            code: "A001".to_string(),
            available: 6,
            requested: 7,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for A001: available 6, requested 7"
        );

        let err = CoreError::EmptyBatch {
            what: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items must contain at least one item");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("code").to_string(), "code is required");

        let err = ValidationError::MustNotBeNegative {
            field: "stock".to_string(),
        };
        assert_eq!(err.to_string(), "stock must not be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("total").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

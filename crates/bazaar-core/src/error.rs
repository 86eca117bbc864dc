//! # Error Types
//!
//! Validation error types for bazaar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  bazaar-core errors (this file)                                     │
//! │  └── ValidationError  - Input validation failures, returned to      │
//! │                         the caller BEFORE an event is dispatched    │
//! │                                                                     │
//! │  bazaar-store errors (separate crate)                               │
//! │  ├── AuthError        - Session action failures, captured into      │
//! │  │                      state.error as data                         │
//! │  └── StoreError       - Facade-level failures                       │
//! │                                                                     │
//! │  The reducer itself has NO error type: it never fails.              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, quantities)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when caller input doesn't meet requirements. Malformed input
/// is rejected here, before any event reaches the reducer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A quantity must be a positive integer.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A monetary amount must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Requested quantity exceeds the available stock.
    ///
    /// The reducer never clamps against stock; this check runs in the cart
    /// action before the event is dispatched.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::InsufficientStock {
            name: "Classic White Shirt".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Classic White Shirt: available 3, requested 5"
        );

        let err = ValidationError::Required {
            field: "email".to_string(),
        };
        assert_eq!(err.to_string(), "email is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }
}

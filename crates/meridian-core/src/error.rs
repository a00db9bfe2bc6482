//! # Error Types
//!
//! Domain-specific error types for meridian-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meridian-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  meridian-draft errors (separate crate)                                │
//! │  └── DraftError       - Draft store / autosave failures                │
//! │                                                                         │
//! │  meridian-session errors (separate crate)                              │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, step, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message
//!
//! Note that most cart mutations do NOT produce errors at all: rejected
//! inputs (unknown SKU, stock exhausted, quantity below one) leave the
//! draft unchanged and the operation reports "no change". Errors here are
//! reserved for the session boundary and for order assembly.

use thiserror::Error;

use crate::wizard::WizardStep;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Catalogue lookup failed for a SKU the caller insisted on.
    ///
    /// ## When This Occurs
    /// - The session tries to add a SKU the catalogue no longer carries
    /// - A stale product tile is clicked after a catalogue refresh
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// The draft cannot be submitted because a wizard step is invalid.
    ///
    /// ## When This Occurs
    /// - `complete()` is called while any of the four steps fails its
    ///   validation rules (the offending step is named)
    #[error("Sale draft is incomplete: step {step:?} is not valid")]
    DraftIncomplete { step: WizardStep },

    /// A terminal action was requested away from the payment step.
    #[error("Cannot complete sale from step {current:?}")]
    NotOnPaymentStep { current: WizardStep },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation at the session boundary before the cart or
/// wizard is touched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid SKU characters, invalid date).
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
        let err = CoreError::DraftIncomplete {
            step: WizardStep::Products,
        };
        assert_eq!(
            err.to_string(),
            "Sale draft is incomplete: step Products is not valid"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "postcode".to_string(),
        };
        assert_eq!(err.to_string(), "postcode is required");

        let err = ValidationError::MustBePositive {
            field: "unit price".to_string(),
        };
        assert_eq!(err.to_string(), "unit price must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

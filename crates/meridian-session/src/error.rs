//! # API Error Type
//!
//! Unified error type for wizard session operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Sale Wizard                        │
//! │                                                                         │
//! │  Frontend                    Rust Backend                               │
//! │  ────────                    ────────────                               │
//! │                                                                         │
//! │  session.add_to_cart(...)                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Session Operation                                               │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │  Boundary check? ── ValidationError ───────────────┐            │  │
//! │  │         │                                          ▼            │  │
//! │  │  Core rule? ─────── CoreError ──────────────────► ApiError ────►│  │
//! │  │         │                                          ▲            │  │
//! │  │  Submission? ────── SubmitError ───────────────────┘            │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  try {                                                                  │
//! │    await session.complete()                                             │
//! │  } catch (e) {                                                          │
//! │    // e.message = "Order service rejected the sale: ..."                │
//! │    // e.code = "SUBMIT_FAILED"  → show retry button, keep the draft     │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use meridian_core::{CoreError, ValidationError};
use meridian_draft::DraftError;

use crate::submit::SubmitError;

/// API error returned from session operations.
///
/// ## Serialization
/// This is what the frontend receives when an operation fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: DT-9999"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Cart operation was rejected
    CartError,

    /// Wizard rule violation (wrong step, incomplete draft)
    BusinessLogic,

    /// Draft store failure
    StorageError,

    /// Order submission failed; the draft was kept for retry
    SubmitFailed,

    /// An order submission is already in flight
    SubmitInProgress,
}

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

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::CartError, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(sku) => ApiError::not_found("Product", &sku),
            CoreError::DraftIncomplete { step } => ApiError::new(
                ErrorCode::BusinessLogic,
                format!("Sale draft is incomplete: step {:?} is not valid", step),
            ),
            CoreError::NotOnPaymentStep { current } => ApiError::new(
                ErrorCode::BusinessLogic,
                format!("Cannot complete sale from step {:?}", current),
            ),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts boundary validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts draft store errors to API errors.
impl From<DraftError> for ApiError {
    fn from(err: DraftError) -> Self {
        // Log the detail; the frontend gets a generic storage message
        tracing::error!(error = %err, "Draft store operation failed");
        ApiError::new(ErrorCode::StorageError, "Draft storage failed")
    }
}

/// Converts submission errors to API errors.
impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        ApiError::new(ErrorCode::SubmitFailed, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================

//! # meridian-core: Pure Business Logic for the Meridian Sale Wizard
//!
//! This crate is the **heart** of the Create Sale flow. It contains all
//! business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Meridian POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     Frontend (wizard UI)                        │   │
//! │  │   Customer form ──► Cart ──► Delivery ──► Payment ──► Submit   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 meridian-session (runtime)                      │   │
//! │  │    SaleSession: catalogue cache, autosave, submission           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ meridian-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  wizard   │  │   │
//! │  │   │ Customer  │  │   Money   │  │ LineItems │  │ SaleDraft │  │   │
//! │  │   │ Catalogue │  │  at_rate  │  │   Line    │  │  4 steps  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │          ┌───────────┐  ┌───────────┐                          │   │
//! │  │          │  totals   │  │ validation│                          │   │
//! │  │          │ SaleTotals│  │ per-step  │                          │   │
//! │  │          └───────────┘  └───────────┘                          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS • PURE FUNCTIONS       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, CatalogueItem, Delivery, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The line-item store with stock-aware mutations
//! - [`totals`] - The sale totals pipeline
//! - [`validation`] - Per-step validation and boundary checks
//! - [`wizard`] - SaleDraft aggregate and the 4-step navigator
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input =
//!    same output. Validation and totals can be re-run speculatively.
//! 2. **No I/O**: Database, network, and clock access are FORBIDDEN here;
//!    "today" and the catalogue are always injected by the caller.
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid
//!    float errors.
//! 4. **Silent no-ops**: Rejected cart inputs leave the draft unchanged
//!    instead of throwing; errors are reserved for the session boundary.
//!
//! ## Example Usage
//!
//! ```rust
//! use meridian_core::money::Money;
//!
//! // Create money from cents (never from floats!)
//! let rrp = Money::from_cents(199900); // $1,999.00
//!
//! // The 30% financing deposit, rounded half-up
//! let deposit = rrp.at_rate(meridian_core::DEPOSIT_RATE_BPS);
//! assert_eq!(deposit.cents(), 59970);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod totals;
pub mod types;
pub mod validation;
pub mod wizard;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use meridian_core::Money` instead of
// `use meridian_core::money::Money`

pub use cart::{Line, LineItems};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use totals::SaleTotals;
pub use types::*;
pub use validation::{DraftValidation, FieldError, StepValidation};
pub use wizard::{OrderPayload, SaleDraft, WizardStep};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps order payloads a sane size.
/// Can be made configurable per-store in future versions.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// White-glove delivery add-on fee, in cents.
pub const WHITE_GLOVE_FEE_CENTS: i64 = 14900;

/// Old mattress removal add-on fee, in cents.
pub const MATTRESS_REMOVAL_FEE_CENTS: i64 = 5500;

/// Bed setup/assembly add-on fee, in cents.
pub const SETUP_FEE_CENTS: i64 = 9900;

/// Default financing deposit rate: 30%, in basis points.
pub const DEPOSIT_RATE_BPS: u32 = 3000;

//! # meridian-session: Wizard Session Runtime
//!
//! The thin orchestration layer the Create Sale UI drives. Business
//! rules live in [`meridian_core`]; persistence in [`meridian_draft`];
//! this crate wires them together and guards the boundaries.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Wizard Session Runtime                              │
//! │                                                                         │
//! │  UI command (add to cart, next step, complete, ...)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                meridian-session (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  session  │  │ catalogue │  │  submit   │  │   error   │  │   │
//! │  │   │SaleSession│  │ TTL cache │  │ SubmitOrd │  │ ApiError  │  │   │
//! │  │   │Mutex draft│  │ MemoryCat │  │   seam    │  │ code+msg  │  │   │
//! │  │   └─────┬─────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────┼───────────────────────────────────────────────────────┘   │
//! │            │                                                            │
//! │     meridian-core (rules)  +  meridian-draft (autosave/store)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`] - `SaleSession`: the live wizard with every UI operation
//! - [`catalogue`] - catalogue collaborator implementations (memory, TTL)
//! - [`submit`] - the Order Submission collaborator seam
//! - [`error`] - the serialized `ApiError` the frontend receives

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalogue;
pub mod error;
pub mod session;
pub mod submit;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalogue::{CachedCatalogue, Clock, MemoryCatalogue, SystemClock, DEFAULT_CATALOGUE_TTL};
pub use error::{ApiError, ErrorCode};
pub use session::{CartView, SaleSession, SessionConfig, StepView};
pub use submit::{SubmitError, SubmitOrders};

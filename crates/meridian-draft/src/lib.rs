//! # meridian-draft: Draft Persistence for the Meridian Sale Wizard
//!
//! Everything about getting a [`meridian_core::SaleDraft`] onto disk and
//! back: the keyed blob store, the durable SQLite implementation, the
//! session-freshness policy, and the debounced autosaver.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Draft Persistence Data Flow                           │
//! │                                                                         │
//! │  SaleSession mutation                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  AutosaveHandle::try_snapshot(envelope)   (fire-and-forget)            │
//! │       │                                                                 │
//! │       ▼  ~1s quiet period, latest wins                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  meridian-draft (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   store   │  │  sqlite   │  │  session  │  │ autosave  │  │   │
//! │  │   │DraftStore │  │ WAL pool  │  │ 4h expiry │  │ debounce  │  │   │
//! │  │   │ Envelope  │  │ upserts   │  │  policy   │  │   task    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sale_drafts table (one row per key)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - `DraftStore` trait, `DraftEnvelope`, in-memory store
//! - [`sqlite`] - durable SQLite-backed store
//! - [`session`] - restore-or-discard freshness policy
//! - [`autosave`] - debounced snapshot writer task
//! - [`error`] - persistence error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod autosave;
pub mod error;
pub mod session;
pub mod sqlite;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use autosave::{Autosaver, AutosaveConfig, AutosaveHandle, DEFAULT_DEBOUNCE_MS};
pub use error::{DraftError, DraftResult};
pub use session::{RestoreDecision, SessionPolicy, DRAFT_MAX_AGE_SECS};
pub use sqlite::SqliteDraftStore;
pub use store::{DraftEnvelope, DraftStore, MemoryDraftStore, DRAFT_KEY};

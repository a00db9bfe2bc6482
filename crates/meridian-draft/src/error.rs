//! # Draft Store Error Types
//!
//! Error types for draft persistence operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite / serde error                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DraftError (this module) ← Adds context and categorization            │
//! │       │                                                                 │
//! │       ├── autosave path: logged via tracing, then SWALLOWED            │
//! │       │   (the in-memory draft stays authoritative)                    │
//! │       │                                                                 │
//! │       └── mount path: surfaced as ApiError so the UI can fall          │
//! │           back to a fresh draft                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Draft persistence errors.
#[derive(Debug, Error)]
pub enum DraftError {
    /// Draft (de)serialization failed.
    #[error("Draft serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The underlying SQLite store failed.
    #[error("Draft store query failed: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be interpreted (bad session id, etc.).
    ///
    /// ## When This Occurs
    /// - The store was written by an incompatible version
    /// - The row was edited by hand
    #[error("Stored draft is corrupt: {0}")]
    Corrupt(String),

    /// The autosaver task is gone (shutdown or panicked).
    #[error("Autosave channel closed")]
    ChannelClosed,
}

/// Convenience type alias for Results with DraftError.
pub type DraftResult<T> = Result<T, DraftError>;

//! # Draft Store
//!
//! The keyed blob store the wizard saves its draft into, as a trait so
//! the session layer doesn't care whether the blob lands in SQLite, a
//! test map, or something else entirely.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      DraftStore Contract                                │
//! │                                                                         │
//! │  save(key, envelope)  - upsert; overwrites any previous snapshot       │
//! │  load(key)            - latest snapshot, or None                       │
//! │  clear(key)           - idempotent delete                              │
//! │                                                                         │
//! │  A snapshot is a DraftEnvelope: the serialized draft plus the          │
//! │  session marker and timestamp the freshness policy needs. The store   │
//! │  never inspects the draft itself.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meridian_core::SaleDraft;

use crate::error::DraftResult;

/// The fixed key the wizard persists its draft under.
///
/// There is exactly one active wizard per session, so one key suffices;
/// the key is still threaded through the API so tests (and a future
/// multi-register setup) can isolate stores.
pub const DRAFT_KEY: &str = "meridian.sale-draft";

// =============================================================================
// Draft Envelope
// =============================================================================

/// A persisted draft snapshot.
///
/// The envelope carries exactly what the restore policy needs to decide
/// freshness without deserializing anything else: which session wrote
/// it, and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEnvelope {
    /// The session that wrote this snapshot.
    pub session_id: Uuid,

    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,

    /// The draft itself.
    pub draft: SaleDraft,
}

// =============================================================================
// Draft Store Trait
// =============================================================================

/// A keyed blob store for draft snapshots.
///
/// Methods return `impl Future + Send` so implementations can be used
/// from the spawned autosaver task without boxing.
pub trait DraftStore: Send + Sync + 'static {
    /// Loads the latest snapshot under `key`, if any.
    fn load(&self, key: &str) -> impl Future<Output = DraftResult<Option<DraftEnvelope>>> + Send;

    /// Upserts the snapshot under `key`.
    fn save(
        &self,
        key: &str,
        envelope: &DraftEnvelope,
    ) -> impl Future<Output = DraftResult<()>> + Send;

    /// Deletes the snapshot under `key`. Idempotent.
    fn clear(&self, key: &str) -> impl Future<Output = DraftResult<()>> + Send;
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// A process-local draft store.
///
/// Used in tests and as the fallback when the durable store cannot be
/// opened - losing the draft on process exit is the documented worst
/// case, never a crash.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    entries: Mutex<HashMap<String, DraftEnvelope>>,
}

impl MemoryDraftStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryDraftStore::default()
    }
}

/// Shared ownership delegates: the session and the autosaver both hold
/// the same store behind an `Arc`.
impl<S: DraftStore> DraftStore for std::sync::Arc<S> {
    fn load(&self, key: &str) -> impl Future<Output = DraftResult<Option<DraftEnvelope>>> + Send {
        S::load(self, key)
    }

    fn save(
        &self,
        key: &str,
        envelope: &DraftEnvelope,
    ) -> impl Future<Output = DraftResult<()>> + Send {
        S::save(self, key, envelope)
    }

    fn clear(&self, key: &str) -> impl Future<Output = DraftResult<()>> + Send {
        S::clear(self, key)
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self, key: &str) -> impl Future<Output = DraftResult<Option<DraftEnvelope>>> + Send {
        let entry = self
            .entries
            .lock()
            .expect("draft store mutex poisoned")
            .get(key)
            .cloned();
        async move { Ok(entry) }
    }

    fn save(
        &self,
        key: &str,
        envelope: &DraftEnvelope,
    ) -> impl Future<Output = DraftResult<()>> + Send {
        self.entries
            .lock()
            .expect("draft store mutex poisoned")
            .insert(key.to_string(), envelope.clone());
        async move { Ok(()) }
    }

    fn clear(&self, key: &str) -> impl Future<Output = DraftResult<()>> + Send {
        self.entries
            .lock()
            .expect("draft store mutex poisoned")
            .remove(key);
        async move { Ok(()) }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::Money;

    fn envelope() -> DraftEnvelope {
        DraftEnvelope {
            session_id: Uuid::new_v4(),
            saved_at: Utc::now(),
            draft: SaleDraft::new(Money::from_cents(9900)),
        }
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryDraftStore::new();
        assert!(store.load(DRAFT_KEY).await.unwrap().is_none());

        let env = envelope();
        store.save(DRAFT_KEY, &env).await.unwrap();

        let loaded = store.load(DRAFT_KEY).await.unwrap().unwrap();
        assert_eq!(loaded.session_id, env.session_id);
        assert_eq!(
            loaded.draft.delivery_fee_base,
            env.draft.delivery_fee_base
        );
    }

    #[tokio::test]
    async fn test_memory_store_save_overwrites() {
        let store = MemoryDraftStore::new();
        let first = envelope();
        let second = envelope();

        store.save(DRAFT_KEY, &first).await.unwrap();
        store.save(DRAFT_KEY, &second).await.unwrap();

        let loaded = store.load(DRAFT_KEY).await.unwrap().unwrap();
        assert_eq!(loaded.session_id, second.session_id);
    }

    #[tokio::test]
    async fn test_memory_store_clear_is_idempotent() {
        let store = MemoryDraftStore::new();
        store.save(DRAFT_KEY, &envelope()).await.unwrap();

        store.clear(DRAFT_KEY).await.unwrap();
        store.clear(DRAFT_KEY).await.unwrap();
        assert!(store.load(DRAFT_KEY).await.unwrap().is_none());
    }

    #[test]
    fn test_envelope_serde_round_trip() {
        let env = envelope();
        let json = serde_json::to_string(&env).unwrap();
        let back: DraftEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.session_id, env.session_id);
        assert_eq!(back.saved_at, env.saved_at);
    }
}

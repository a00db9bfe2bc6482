//! # Session Freshness Policy
//!
//! Decides, on wizard mount, whether a stored draft snapshot should be
//! restored or discarded.
//!
//! ## The One Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               Restore-or-Discard Decision                               │
//! │                                                                         │
//! │  stored snapshot?                                                      │
//! │   ├── none ─────────────────────────────► start fresh                 │
//! │   │                                                                     │
//! │   ├── written by THIS session ──────────► restore                      │
//! │   │   (a reload mid-sale keeps the cart)                               │
//! │   │                                                                     │
//! │   └── written by ANOTHER session                                       │
//! │        ├── younger than max age (4h) ───► restore                      │
//! │        └── older ───────────────────────► start fresh + clear store    │
//! │                                                                         │
//! │  This is a data-freshness policy, not a security boundary. "now" is    │
//! │  injected so the decision is a pure function.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::store::DraftEnvelope;

/// Maximum age a foreign-session draft may have and still be restored.
pub const DRAFT_MAX_AGE_SECS: i64 = 4 * 60 * 60;

// =============================================================================
// Restore Decision
// =============================================================================

/// Outcome of the mount-time decision.
#[derive(Debug, Clone)]
pub enum RestoreDecision {
    /// Put this snapshot's draft back on screen.
    Restore(DraftEnvelope),

    /// Begin with an empty draft.
    StartFresh {
        /// A stale snapshot exists and should be deleted from the store.
        clear_store: bool,
    },
}

// =============================================================================
// Session Policy
// =============================================================================

/// The freshness policy, with a configurable max age.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    max_age: Duration,
}

impl SessionPolicy {
    /// Policy with a custom max age.
    pub fn new(max_age: Duration) -> Self {
        SessionPolicy { max_age }
    }

    /// Decides what to do with a loaded snapshot.
    ///
    /// Pure: `now` is injected by the caller.
    pub fn decide(
        &self,
        stored: Option<DraftEnvelope>,
        current_session: Uuid,
        now: DateTime<Utc>,
    ) -> RestoreDecision {
        let Some(envelope) = stored else {
            return RestoreDecision::StartFresh { clear_store: false };
        };

        // Same session: a reload is never "start over"
        if envelope.session_id == current_session {
            return RestoreDecision::Restore(envelope);
        }

        // Foreign session: restore only while fresh
        if now.signed_duration_since(envelope.saved_at) <= self.max_age {
            RestoreDecision::Restore(envelope)
        } else {
            RestoreDecision::StartFresh { clear_store: true }
        }
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        SessionPolicy {
            max_age: Duration::seconds(DRAFT_MAX_AGE_SECS),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use meridian_core::{Money, SaleDraft};

    fn envelope_at(session_id: Uuid, saved_at: DateTime<Utc>) -> DraftEnvelope {
        DraftEnvelope {
            session_id,
            saved_at,
            draft: SaleDraft::new(Money::zero()),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_no_snapshot_starts_fresh_without_clearing() {
        let policy = SessionPolicy::default();
        match policy.decide(None, Uuid::new_v4(), now()) {
            RestoreDecision::StartFresh { clear_store } => assert!(!clear_store),
            RestoreDecision::Restore(_) => panic!("nothing to restore"),
        }
    }

    #[test]
    fn test_same_session_always_restores() {
        let policy = SessionPolicy::default();
        let session = Uuid::new_v4();
        // Even a very old same-session snapshot restores: a reload is
        // not "start over"
        let stale = envelope_at(session, now() - Duration::hours(30));

        assert!(matches!(
            policy.decide(Some(stale), session, now()),
            RestoreDecision::Restore(_)
        ));
    }

    #[test]
    fn test_fresh_foreign_snapshot_restores() {
        let policy = SessionPolicy::default();
        let env = envelope_at(Uuid::new_v4(), now() - Duration::hours(3));

        assert!(matches!(
            policy.decide(Some(env), Uuid::new_v4(), now()),
            RestoreDecision::Restore(_)
        ));
    }

    #[test]
    fn test_stale_foreign_snapshot_clears() {
        let policy = SessionPolicy::default();
        let env = envelope_at(Uuid::new_v4(), now() - Duration::hours(5));

        match policy.decide(Some(env), Uuid::new_v4(), now()) {
            RestoreDecision::StartFresh { clear_store } => assert!(clear_store),
            RestoreDecision::Restore(_) => panic!("stale snapshot must not restore"),
        }
    }

    #[test]
    fn test_exactly_max_age_still_restores() {
        let policy = SessionPolicy::default();
        let env = envelope_at(
            Uuid::new_v4(),
            now() - Duration::seconds(DRAFT_MAX_AGE_SECS),
        );

        assert!(matches!(
            policy.decide(Some(env), Uuid::new_v4(), now()),
            RestoreDecision::Restore(_)
        ));
    }
}

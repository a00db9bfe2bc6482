//! # SQLite Draft Store
//!
//! The durable [`DraftStore`] implementation: one tiny table of draft
//! snapshots in a local SQLite file.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Durable Draft Storage                                │
//! │                                                                         │
//! │  Register startup                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteDraftStore::open(path) ← pool + WAL + schema bootstrap          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────┐                       │
//! │  │  sale_drafts                                │                       │
//! │  │  ───────────────────────────────────────    │                       │
//! │  │  draft_key   TEXT PRIMARY KEY               │                       │
//! │  │  session_id  TEXT                           │                       │
//! │  │  saved_at    TEXT (RFC 3339)                │                       │
//! │  │  payload     TEXT (draft JSON)              │                       │
//! │  └─────────────────────────────────────────────┘                       │
//! │                                                                         │
//! │  save() is an upsert: exactly one row per key, always the latest       │
//! │  snapshot. The autosaver is the only writer.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! WAL (Write-Ahead Logging) is enabled so the UI thread's occasional
//! load never blocks behind an autosave write, and for better crash
//! recovery.

use std::future::Future;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DraftError, DraftResult};
use crate::store::{DraftEnvelope, DraftStore};

/// Schema bootstrap. `IF NOT EXISTS` keeps startup idempotent - a
/// single-table store doesn't warrant a migration framework.
const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS sale_drafts (
    draft_key   TEXT PRIMARY KEY,
    session_id  TEXT NOT NULL,
    saved_at    TEXT NOT NULL,
    payload     TEXT NOT NULL
)";

/// A SQLite-backed draft store.
#[derive(Debug, Clone)]
pub struct SqliteDraftStore {
    pool: SqlitePool,
}

impl SqliteDraftStore {
    /// Opens (or creates) the store at `path` and bootstraps the schema.
    pub async fn open(path: impl AsRef<Path>) -> DraftResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        Self::bootstrap(&pool).await?;
        info!(path = %path.as_ref().display(), "Draft store opened");
        Ok(SqliteDraftStore { pool })
    }

    /// Opens an in-memory store (tests).
    ///
    /// A single connection is required: each in-memory SQLite connection
    /// is its own database.
    pub async fn in_memory() -> DraftResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Self::bootstrap(&pool).await?;
        Ok(SqliteDraftStore { pool })
    }

    async fn bootstrap(pool: &SqlitePool) -> DraftResult<()> {
        sqlx::query(SCHEMA).execute(pool).await?;
        Ok(())
    }
}

impl DraftStore for SqliteDraftStore {
    fn load(&self, key: &str) -> impl Future<Output = DraftResult<Option<DraftEnvelope>>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move {
            let row = sqlx::query(
                "SELECT session_id, saved_at, payload FROM sale_drafts WHERE draft_key = ?1",
            )
            .bind(&key)
            .fetch_optional(&pool)
            .await?;

            let Some(row) = row else {
                return Ok(None);
            };

            let session_id: String = row.try_get("session_id")?;
            let session_id = Uuid::parse_str(&session_id)
                .map_err(|e| DraftError::Corrupt(format!("bad session id: {}", e)))?;
            let saved_at: DateTime<Utc> = row.try_get("saved_at")?;
            let payload: String = row.try_get("payload")?;
            let draft = serde_json::from_str(&payload)?;

            debug!(key = %key, saved_at = %saved_at, "Draft snapshot loaded");
            Ok(Some(DraftEnvelope {
                session_id,
                saved_at,
                draft,
            }))
        }
    }

    fn save(
        &self,
        key: &str,
        envelope: &DraftEnvelope,
    ) -> impl Future<Output = DraftResult<()>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        let session_id = envelope.session_id.to_string();
        let saved_at = envelope.saved_at;
        let payload = serde_json::to_string(&envelope.draft);
        async move {
            sqlx::query(
                "INSERT INTO sale_drafts (draft_key, session_id, saved_at, payload)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(draft_key) DO UPDATE SET
                     session_id = excluded.session_id,
                     saved_at = excluded.saved_at,
                     payload = excluded.payload",
            )
            .bind(&key)
            .bind(&session_id)
            .bind(saved_at)
            .bind(payload?)
            .execute(&pool)
            .await?;
            Ok(())
        }
    }

    fn clear(&self, key: &str) -> impl Future<Output = DraftResult<()>> + Send {
        let pool = self.pool.clone();
        let key = key.to_string();
        async move {
            sqlx::query("DELETE FROM sale_drafts WHERE draft_key = ?1")
                .bind(&key)
                .execute(&pool)
                .await?;
            Ok(())
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DRAFT_KEY;
    use meridian_core::{Money, SaleDraft};

    fn envelope() -> DraftEnvelope {
        let mut draft = SaleDraft::new(Money::from_cents(9900));
        draft.customer.first_name = "May".to_string();
        DraftEnvelope {
            session_id: Uuid::new_v4(),
            saved_at: Utc::now(),
            draft,
        }
    }

    #[tokio::test]
    async fn test_sqlite_round_trip() {
        let store = SqliteDraftStore::in_memory().await.unwrap();
        assert!(store.load(DRAFT_KEY).await.unwrap().is_none());

        let env = envelope();
        store.save(DRAFT_KEY, &env).await.unwrap();

        let loaded = store.load(DRAFT_KEY).await.unwrap().unwrap();
        assert_eq!(loaded.session_id, env.session_id);
        assert_eq!(loaded.draft.customer.first_name, "May");
        assert_eq!(loaded.draft.delivery_fee_base, Money::from_cents(9900));
    }

    #[tokio::test]
    async fn test_sqlite_save_is_an_upsert() {
        let store = SqliteDraftStore::in_memory().await.unwrap();

        let first = envelope();
        let mut second = envelope();
        second.draft.customer.first_name = "Priya".to_string();

        store.save(DRAFT_KEY, &first).await.unwrap();
        store.save(DRAFT_KEY, &second).await.unwrap();

        let loaded = store.load(DRAFT_KEY).await.unwrap().unwrap();
        assert_eq!(loaded.session_id, second.session_id);
        assert_eq!(loaded.draft.customer.first_name, "Priya");
    }

    #[tokio::test]
    async fn test_sqlite_clear_is_idempotent() {
        let store = SqliteDraftStore::in_memory().await.unwrap();
        store.save(DRAFT_KEY, &envelope()).await.unwrap();

        store.clear(DRAFT_KEY).await.unwrap();
        store.clear(DRAFT_KEY).await.unwrap();
        assert!(store.load(DRAFT_KEY).await.unwrap().is_none());
    }
}

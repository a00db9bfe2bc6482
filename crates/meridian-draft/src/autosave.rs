//! # Draft Autosaver
//!
//! Debounced persistence of draft snapshots: the wizard fires a snapshot
//! on every mutation, and this task coalesces the burst into one write.
//!
//! ## How It Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Debounced Autosave                                   │
//! │                                                                         │
//! │  wizard mutation ──► try_snapshot(envelope) ──► mpsc ──┐               │
//! │  wizard mutation ──► try_snapshot(envelope) ──► mpsc ──┤  (latest      │
//! │  wizard mutation ──► try_snapshot(envelope) ──► mpsc ──┤   wins)       │
//! │                                                        ▼               │
//! │                                            ┌────────────────────┐      │
//! │                                            │  Autosaver task    │      │
//! │                                            │  pending = Some(e) │      │
//! │                                            │  deadline = now+1s │      │
//! │                                            └─────────┬──────────┘      │
//! │                                                      │ quiet for 1s    │
//! │                                                      ▼                 │
//! │                                            store.save(key, latest)     │
//! │                                                                         │
//! │  FIRE AND FORGET: a failed write is logged and dropped. The in-memory  │
//! │  draft stays authoritative; the next mutation schedules a new write.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The task is controlled through a cloneable [`AutosaveHandle`] carrying
//! Snapshot / Flush / Shutdown commands over an mpsc channel.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use crate::error::{DraftError, DraftResult};
use crate::store::{DraftEnvelope, DraftStore, DRAFT_KEY};

// =============================================================================
// Constants
// =============================================================================

/// Default debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;

/// Command channel capacity. Snapshots beyond this are dropped (the
/// next mutation re-schedules anyway), which keeps the wizard thread
/// from ever blocking on persistence.
const COMMAND_BUFFER: usize = 64;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the autosaver.
#[derive(Debug, Clone)]
pub struct AutosaveConfig {
    /// Store key to write under.
    pub key: String,
    /// Quiet period before a pending snapshot is written.
    pub debounce: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        AutosaveConfig {
            key: DRAFT_KEY.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

// =============================================================================
// Commands & Handle
// =============================================================================

/// Commands for the autosaver task.
#[derive(Debug)]
enum AutosaveCommand {
    /// Replace the pending snapshot and restart the debounce window.
    Snapshot(Box<DraftEnvelope>),
    /// Write any pending snapshot immediately; ack when done.
    Flush(oneshot::Sender<()>),
    /// Drop any pending snapshot without writing; ack when done.
    Discard(oneshot::Sender<()>),
    /// Write any pending snapshot, then stop.
    Shutdown,
}

/// Handle for feeding the autosaver.
#[derive(Debug, Clone)]
pub struct AutosaveHandle {
    cmd_tx: mpsc::Sender<AutosaveCommand>,
}

impl AutosaveHandle {
    /// Queues a snapshot without waiting.
    ///
    /// Fire-and-forget by design: returns `false` when the command
    /// buffer is full or the task is gone, and the caller just logs it -
    /// a dropped snapshot is superseded by the next mutation's snapshot.
    pub fn try_snapshot(&self, envelope: DraftEnvelope) -> bool {
        self.cmd_tx
            .try_send(AutosaveCommand::Snapshot(Box::new(envelope)))
            .is_ok()
    }

    /// Queues a snapshot, waiting for channel capacity.
    pub async fn snapshot(&self, envelope: DraftEnvelope) -> DraftResult<()> {
        self.cmd_tx
            .send(AutosaveCommand::Snapshot(Box::new(envelope)))
            .await
            .map_err(|_| DraftError::ChannelClosed)
    }

    /// Writes any pending snapshot now and waits until it is on disk.
    ///
    /// Used before a deliberate teardown (register shutdown); the
    /// steady-state path never waits.
    pub async fn flush(&self) -> DraftResult<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(AutosaveCommand::Flush(tx))
            .await
            .map_err(|_| DraftError::ChannelClosed)?;
        rx.await.map_err(|_| DraftError::ChannelClosed)
    }

    /// Drops any pending snapshot without writing it.
    ///
    /// Used when the draft was just cleared (successful submission): a
    /// snapshot taken before the clear must not land afterwards and
    /// resurrect the sale.
    pub async fn discard(&self) -> DraftResult<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(AutosaveCommand::Discard(tx))
            .await
            .map_err(|_| DraftError::ChannelClosed)?;
        rx.await.map_err(|_| DraftError::ChannelClosed)
    }

    /// Stops the task after writing any pending snapshot.
    pub async fn shutdown(&self) -> DraftResult<()> {
        self.cmd_tx
            .send(AutosaveCommand::Shutdown)
            .await
            .map_err(|_| DraftError::ChannelClosed)
    }
}

// =============================================================================
// Autosaver
// =============================================================================

/// The debounced snapshot writer.
pub struct Autosaver<S: DraftStore> {
    store: S,
    config: AutosaveConfig,
}

impl<S: DraftStore> Autosaver<S> {
    /// Creates an autosaver over a store.
    pub fn new(store: S, config: AutosaveConfig) -> Self {
        Autosaver { store, config }
    }

    /// Spawns the task and returns its handle.
    pub fn start(self) -> AutosaveHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);

        tokio::spawn(async move {
            self.run(cmd_rx).await;
        });

        AutosaveHandle { cmd_tx }
    }

    /// Main loop: coalesce snapshots, write after the quiet period.
    async fn run(self, mut cmd_rx: mpsc::Receiver<AutosaveCommand>) {
        debug!(key = %self.config.key, debounce_ms = self.config.debounce.as_millis() as u64, "Draft autosaver started");

        let mut pending: Option<DraftEnvelope> = None;
        let mut deadline = Instant::now();

        loop {
            tokio::select! {
                maybe_cmd = cmd_rx.recv() => {
                    match maybe_cmd {
                        Some(AutosaveCommand::Snapshot(envelope)) => {
                            // Latest wins; every snapshot restarts the window
                            pending = Some(*envelope);
                            deadline = Instant::now() + self.config.debounce;
                        }
                        Some(AutosaveCommand::Flush(ack)) => {
                            self.write(&mut pending).await;
                            let _ = ack.send(());
                        }
                        Some(AutosaveCommand::Discard(ack)) => {
                            pending = None;
                            let _ = ack.send(());
                        }
                        Some(AutosaveCommand::Shutdown) | None => {
                            self.write(&mut pending).await;
                            break;
                        }
                    }
                }
                _ = time::sleep_until(deadline), if pending.is_some() => {
                    self.write(&mut pending).await;
                }
            }
        }

        debug!("Draft autosaver stopped");
    }

    /// Writes and clears the pending snapshot, if any.
    ///
    /// Persistence failures are non-fatal: log and move on.
    async fn write(&self, pending: &mut Option<DraftEnvelope>) {
        let Some(envelope) = pending.take() else {
            return;
        };
        match self.store.save(&self.config.key, &envelope).await {
            Ok(()) => debug!(saved_at = %envelope.saved_at, "Draft snapshot written"),
            Err(err) => warn!(error = %err, "Draft snapshot write failed; draft kept in memory"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! Debounced editing/sync controller.
//!
//! A single background task owns the outbound save path for one resume.
//! Local edits are applied synchronously by the session; only the network
//! flush is delayed. The controller buffers the latest content snapshot and
//! arms a timer of the configured delay on every edit (trailing debounce):
//! when the quiet period elapses, exactly one PUT carrying the final
//! accumulated content is issued.
//!
//! Flushes are serialized by construction — the task awaits each PUT to
//! completion before looking at the next message, so an edit arriving while
//! a flush is in flight becomes the next pending cycle and out-of-order
//! writes are impossible. Dropping every handle cancels any pending flush;
//! `close` flushes outstanding edits first. A disposed controller never
//! writes again.
//!
//! Failure policy: a failed flush is logged and surfaced through the status,
//! nothing is rolled back and nothing is retried. PUTs replace content
//! wholesale, so the next successful flush reconverges server state.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::ResumeStore;
use crate::models::resume::ResumeContent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Idle,
    Pending,
    Flushing,
}

/// Observable controller state, published on a watch channel. The editor
/// page polls this to drive its "Saving…" indicator.
#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub state: SyncState,
    pub last_error: Option<String>,
    /// Version the server assigned to the last successful flush.
    pub acked_version: Option<i32>,
}

enum Msg {
    Edit(ResumeContent),
    Flush(oneshot::Sender<()>),
    Close(oneshot::Sender<()>),
}

/// Handle to the sync task, owned by one editing session.
pub struct SyncHandle {
    tx: mpsc::UnboundedSender<Msg>,
    status: watch::Receiver<SyncStatus>,
}

impl SyncHandle {
    /// Spawns a controller bound to one resume id.
    pub fn spawn(resume_id: Uuid, store: Arc<dyn ResumeStore>, delay: Duration) -> SyncHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(SyncStatus {
            state: SyncState::Idle,
            last_error: None,
            acked_version: None,
        });

        tokio::spawn(run(resume_id, store, delay, rx, status_tx));

        SyncHandle {
            tx,
            status: status_rx,
        }
    }

    /// Buffers the latest content snapshot and arms (or resets) the debounce
    /// timer. Never blocks.
    pub fn enqueue(&self, content: ResumeContent) {
        let _ = self.tx.send(Msg::Edit(content));
    }

    /// Flushes any pending content immediately, bypassing the delay.
    /// Resolves once the flush (if any) has settled.
    pub async fn flush_now(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Msg::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Flushes outstanding edits, then disposes the controller.
    pub async fn close(self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Msg::Close(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    pub fn status(&self) -> SyncStatus {
        self.status.borrow().clone()
    }
}

async fn run(
    resume_id: Uuid,
    store: Arc<dyn ResumeStore>,
    delay: Duration,
    mut rx: mpsc::UnboundedReceiver<Msg>,
    status: watch::Sender<SyncStatus>,
) {
    let mut pending: Option<ResumeContent> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        // With a timer armed, wake on whichever comes first: the next
        // message or the deadline. Otherwise just wait for a message.
        let msg = match deadline {
            Some(at) => tokio::select! {
                received = rx.recv() => match received {
                    Some(msg) => Some(msg),
                    // Every handle dropped: cancel the pending flush.
                    None => break,
                },
                _ = sleep_until(at) => None,
            },
            None => match rx.recv().await {
                Some(msg) => Some(msg),
                None => break,
            },
        };

        match msg {
            Some(Msg::Edit(content)) => {
                pending = Some(content);
                deadline = Some(Instant::now() + delay);
                status.send_modify(|s| s.state = SyncState::Pending);
                debug!("Buffered edit for resume {resume_id}, timer armed");
            }
            Some(Msg::Flush(ack)) => {
                deadline = None;
                if let Some(content) = pending.take() {
                    flush(resume_id, store.as_ref(), content, &status).await;
                }
                let _ = ack.send(());
            }
            Some(Msg::Close(ack)) => {
                if let Some(content) = pending.take() {
                    flush(resume_id, store.as_ref(), content, &status).await;
                }
                let _ = ack.send(());
                break;
            }
            // Quiet period elapsed.
            None => {
                deadline = None;
                if let Some(content) = pending.take() {
                    flush(resume_id, store.as_ref(), content, &status).await;
                }
            }
        }
    }

    debug!("Sync controller for resume {resume_id} disposed");
}

async fn flush(
    resume_id: Uuid,
    store: &dyn ResumeStore,
    content: ResumeContent,
    status: &watch::Sender<SyncStatus>,
) {
    status.send_modify(|s| s.state = SyncState::Flushing);

    match store.put_content(resume_id, &content).await {
        Ok(resume) => {
            info!(
                "Flushed resume {resume_id} as version {}",
                resume.current_version
            );
            status.send_modify(|s| {
                s.state = SyncState::Idle;
                s.last_error = None;
                s.acked_version = Some(resume.current_version);
            });
        }
        Err(e) => {
            // Not retried; the local view stays authoritative and the next
            // successful flush carries the full latest content.
            warn!("Failed to flush resume {resume_id}: {e}");
            status.send_modify(|s| {
                s.state = SyncState::Idle;
                s.last_error = Some(e.to_string());
            });
        }
    }
}

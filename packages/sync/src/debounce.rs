//! # Per-page debounce scheduler
//!
//! Coalesces rapid committed edits into at most one outbound write per
//! quiet period. Each page owns an independent, cancelable timer task;
//! there is no global lock across pages.
//!
//! Synchronization is catch-up, not transactional: a failed write logs,
//! emits a dismissible notice, and is otherwise forgotten. Local state
//! stays authoritative for the live session.

use crate::store::{PagePatch, PageStore};
use draftboard_document::Page;
use draftboard_editor::EditEvent;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Quiet period before a pending page write goes out.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(400);

/// Transient, dismissible notice surfaced to the UI.
#[derive(Debug, Clone)]
pub enum SyncNotice {
    PersistFailed { page_id: String, message: String },
}

pub struct PageSyncer<S> {
    store: Arc<S>,
    delay: Duration,
    /// Pending timer task per page id. Re-scheduling aborts the old one.
    pending: HashMap<String, JoinHandle<()>>,
    notice_tx: mpsc::UnboundedSender<SyncNotice>,
    notice_rx: Option<mpsc::UnboundedReceiver<SyncNotice>>,
}

impl<S: PageStore + 'static> PageSyncer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_delay(store, DEBOUNCE_DELAY)
    }

    pub fn with_delay(store: Arc<S>, delay: Duration) -> Self {
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        Self {
            store,
            delay,
            pending: HashMap::new(),
            notice_tx,
            notice_rx: Some(notice_rx),
        }
    }

    /// Take the notice stream. Can be taken once.
    pub fn notices(&mut self) -> Option<mpsc::UnboundedReceiver<SyncNotice>> {
        self.notice_rx.take()
    }

    /// (Re)arm the page's timer with a fresh snapshot of its state. Only
    /// the last schedule within a quiet period issues a write.
    pub fn schedule(&mut self, page: &Page) {
        self.pending.retain(|_, handle| !handle.is_finished());
        if let Some(handle) = self.pending.remove(&page.id) {
            handle.abort();
        }

        let patch = PagePatch::from_page(page);
        let page_id = page.id.clone();
        let store = Arc::clone(&self.store);
        let notice_tx = self.notice_tx.clone();
        // The quiet period starts now, not at the task's first poll.
        let deadline = Instant::now() + self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            match store.persist(&page_id, patch).await {
                Ok(()) => {
                    tracing::debug!(page = %page_id, "page persisted");
                }
                Err(err) => {
                    // Best-effort: no retry, no rollback.
                    tracing::warn!(
                        page = %page_id,
                        error = %err,
                        "page persistence failed; local state stays authoritative"
                    );
                    let _ = notice_tx.send(SyncNotice::PersistFailed {
                        page_id,
                        message: err.to_string(),
                    });
                }
            }
        });

        self.pending.insert(page.id.clone(), handle);
    }

    /// True while any page has an armed timer.
    pub fn has_pending(&self) -> bool {
        self.pending.values().any(|h| !h.is_finished())
    }
}

/// Drive a syncer from an edit session's committed-change events.
pub fn spawn_observer<S: PageStore + 'static>(
    mut syncer: PageSyncer<S>,
    mut events: mpsc::UnboundedReceiver<EditEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                EditEvent::PageCommitted { page } => syncer.schedule(&page),
            }
        }
    })
}

//! Shared upload state: the queue, the single-flight flag, and the session cells.
//!
//! Every cell is a `tokio::sync::watch` sender so the UI can subscribe to
//! changes. Queue mutations run inside the watch lock as short synchronous
//! closures; nothing here is held across an await.
//!
//! Writes that target an item go through an id lookup and are no-ops when the
//! id is gone or the item is no longer uploading, so a transfer that finishes
//! after its item was removed (or removed and admitted again) cannot touch it.

use tokio::sync::watch;

use crate::queue::{QueueItem, QueueState, UploadFile};

/// Status string before the push channel has said anything.
pub const INITIAL_STATUS: &str = "waiting";

#[derive(Debug)]
pub struct UploadContext {
    queue: watch::Sender<Vec<QueueItem>>,
    uploading: watch::Sender<bool>,
    session_id: watch::Sender<Option<String>>,
    status: watch::Sender<String>,
}

impl Default for UploadContext {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadContext {
    pub fn new() -> Self {
        Self {
            queue: watch::channel(Vec::new()).0,
            uploading: watch::channel(false).0,
            session_id: watch::channel(None).0,
            status: watch::channel(INITIAL_STATUS.to_string()).0,
        }
    }

    // --- queue (read side) ---

    /// Snapshot of the queue in display order.
    pub fn queue(&self) -> Vec<QueueItem> {
        self.queue.borrow().clone()
    }

    pub fn subscribe_queue(&self) -> watch::Receiver<Vec<QueueItem>> {
        self.queue.subscribe()
    }

    pub fn item(&self, id: &str) -> Option<QueueItem> {
        self.queue.borrow().iter().find(|i| i.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.queue.borrow().iter().any(|i| i.id == id)
    }

    /// True while the item with `id` is in the `uploading` state.
    pub(crate) fn is_in_flight(&self, id: &str) -> bool {
        self.queue
            .borrow()
            .iter()
            .any(|i| i.id == id && i.state == QueueState::Uploading)
    }

    /// Ids of pending items, in queue order.
    pub(crate) fn pending_ids(&self) -> Vec<String> {
        self.queue
            .borrow()
            .iter()
            .filter(|i| i.state == QueueState::Pending)
            .map(|i| i.id.clone())
            .collect()
    }

    // --- queue (write side) ---

    /// Run `f` against the queue; subscribers are notified only when it returns true.
    pub(crate) fn modify_queue(&self, f: impl FnOnce(&mut Vec<QueueItem>) -> bool) -> bool {
        self.queue.send_if_modified(f)
    }

    /// Apply `f` to the item with `id`. Returns false (and changes nothing) if it is gone.
    #[cfg(test)]
    pub(crate) fn update_item(&self, id: &str, f: impl FnOnce(&mut QueueItem)) -> bool {
        self.queue
            .send_if_modified(|q| match q.iter_mut().find(|i| i.id == id) {
                Some(item) => {
                    f(item);
                    true
                }
                None => false,
            })
    }

    /// Move a pending item to `uploading` with progress 0 and hand back its payload.
    /// Returns None if the item was removed or is no longer pending.
    pub(crate) fn begin_upload(&self, id: &str) -> Option<UploadFile> {
        let mut file = None;
        self.queue.send_if_modified(|q| {
            match q
                .iter_mut()
                .find(|i| i.id == id && i.state == QueueState::Pending)
            {
                Some(item) => {
                    item.state = QueueState::Uploading;
                    item.progress = 0;
                    item.error = None;
                    file = Some(item.file.clone());
                    true
                }
                None => false,
            }
        });
        file
    }

    /// Raise the progress of an uploading item. Lower or equal values are ignored.
    pub(crate) fn raise_progress(&self, id: &str, percent: u8) -> bool {
        let percent = percent.min(100);
        self.queue.send_if_modified(|q| {
            match q
                .iter_mut()
                .find(|i| i.id == id && i.state == QueueState::Uploading)
            {
                Some(item) if percent > item.progress => {
                    item.progress = percent;
                    true
                }
                _ => false,
            }
        })
    }

    /// Record a terminal state for an uploading item. `Done` also sets progress to 100.
    /// Returns false if the item is gone or was re-admitted as pending meanwhile.
    pub(crate) fn finish_item(&self, id: &str, state: QueueState, error: Option<String>) -> bool {
        self.queue.send_if_modified(|q| {
            match q
                .iter_mut()
                .find(|i| i.id == id && i.state == QueueState::Uploading)
            {
                Some(item) => {
                    item.state = state;
                    item.error = error;
                    if state == QueueState::Done {
                        item.progress = 100;
                    }
                    true
                }
                None => false,
            }
        })
    }

    // --- single-flight flag ---

    pub fn is_uploading(&self) -> bool {
        *self.uploading.borrow()
    }

    pub fn subscribe_uploading(&self) -> watch::Receiver<bool> {
        self.uploading.subscribe()
    }

    /// Atomically set the flag. Returns false if a run already holds it.
    pub(crate) fn try_begin_run(&self) -> bool {
        self.uploading.send_if_modified(|running| {
            if *running {
                false
            } else {
                *running = true;
                true
            }
        })
    }

    pub(crate) fn end_run(&self) {
        self.uploading.send_replace(false);
    }

    // --- session cells ---

    pub fn session_id(&self) -> Option<String> {
        self.session_id.borrow().clone()
    }

    pub fn subscribe_session_id(&self) -> watch::Receiver<Option<String>> {
        self.session_id.subscribe()
    }

    pub fn set_session_id(&self, id: impl Into<String>) {
        self.session_id.send_replace(Some(id.into()));
    }

    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<String> {
        self.status.subscribe()
    }

    pub fn set_status(&self, status: impl Into<String>) {
        self.status.send_replace(status.into());
    }
}

use std::fmt;

use super::file::UploadFile;

/// Lifecycle of a queue item. `Done`, `Error` and `Skipped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueState {
    Pending,
    Uploading,
    Done,
    Error,
    Skipped,
}

impl QueueState {
    pub fn is_terminal(self) -> bool {
        matches!(self, QueueState::Done | QueueState::Error | QueueState::Skipped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QueueState::Pending => "pending",
            QueueState::Uploading => "uploading",
            QueueState::Done => "done",
            QueueState::Error => "error",
            QueueState::Skipped => "skipped",
        }
    }
}

impl fmt::Display for QueueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One admitted upload candidate.
#[derive(Debug, Clone)]
pub struct QueueItem {
    /// Fingerprint of `file`; unique within the queue.
    pub id: String,
    pub file: UploadFile,
    /// Percent complete, 0..=100.
    pub progress: u8,
    pub state: QueueState,
    /// Failure (or skip) reason.
    pub error: Option<String>,
}

impl QueueItem {
    pub(crate) fn pending(file: UploadFile) -> Self {
        Self {
            id: file.fingerprint(),
            file,
            progress: 0,
            state: QueueState::Pending,
            error: None,
        }
    }

    pub(crate) fn skipped(file: UploadFile, reason: &str) -> Self {
        Self {
            id: file.fingerprint(),
            file,
            progress: 0,
            state: QueueState::Skipped,
            error: Some(reason.to_string()),
        }
    }
}

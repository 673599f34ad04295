//! Results reported by admission and by a run.

/// What `admit` did with a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdmitSummary {
    /// Appended as pending.
    pub added: usize,
    /// Appended as skipped (too large).
    pub skipped: usize,
    /// Already queued; ignored.
    pub duplicates: usize,
}

/// Per-run tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub done: usize,
    pub failed: usize,
    /// Snapshot entries removed (or no longer pending) before their turn.
    pub vanished: usize,
}

/// Result of `run`. None of these are errors for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Another run was in progress; nothing happened.
    AlreadyRunning,
    /// No session id; the user was notified and the queue left alone.
    NoSession,
    Completed(RunSummary),
}

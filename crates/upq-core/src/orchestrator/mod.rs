//! Upload orchestrator: admission, single-flight runs, pruning.
//!
//! A run snapshots the pending ids at call time and uploads them one at a
//! time: rate-limit permit, transfer, terminal state. A failed item never
//! aborts the batch. Items admitted during a run wait for the next run.

mod admit;
mod guard;
mod run;
mod summary;

use std::sync::{Arc, Mutex, MutexGuard};

use crate::context::UploadContext;
use crate::notify::{NoticeLevel, Notifier, TracingNotifier};
use crate::queue::{QueueState, UploadFile};
use crate::rate_limit::{FixedWindowLimiter, RatePolicy};
use crate::retry::RetryPolicy;
use crate::transfer::TransferDriver;

pub use summary::{AdmitSummary, RunOutcome, RunSummary};

/// Shown to the user when a run is requested before a session id arrived.
pub const NO_SESSION_MESSAGE: &str = "Link Telegram first!";

pub struct UploadOrchestrator {
    ctx: Arc<UploadContext>,
    driver: Arc<dyn TransferDriver>,
    limiter: Mutex<FixedWindowLimiter>,
    retry: RetryPolicy,
    notifier: Arc<dyn Notifier>,
}

impl UploadOrchestrator {
    pub fn new(ctx: Arc<UploadContext>, driver: Arc<dyn TransferDriver>, rate: RatePolicy) -> Self {
        Self {
            ctx,
            driver,
            limiter: Mutex::new(FixedWindowLimiter::new(rate)),
            retry: RetryPolicy::default(),
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn context(&self) -> &Arc<UploadContext> {
        &self.ctx
    }

    /// Add files to the end of the queue. Duplicates are ignored; files over
    /// 8 MiB are added as skipped.
    pub fn admit(&self, files: impl IntoIterator<Item = UploadFile>) -> AdmitSummary {
        let mut summary = AdmitSummary::default();
        self.ctx.modify_queue(|q| {
            summary = admit::admit_into(q, files);
            summary.added + summary.skipped > 0
        });
        summary
    }

    /// Remove every `done` and `skipped` item, keeping the order of the rest.
    /// Returns how many were removed.
    pub fn clear_done(&self) -> usize {
        let mut removed = 0;
        self.ctx.modify_queue(|q| {
            let before = q.len();
            q.retain(|i| !matches!(i.state, QueueState::Done | QueueState::Skipped));
            removed = before - q.len();
            removed > 0
        });
        removed
    }

    /// Remove an item whatever its state. An in-flight transfer for it keeps
    /// running; its result is dropped. Returns false if the id was not queued.
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.ctx.modify_queue(|q| {
            let before = q.len();
            q.retain(|i| i.id != id);
            q.len() != before
        });
        if removed {
            tracing::debug!(item = %id, "removed from queue");
        }
        removed
    }

    /// Upload every currently pending item, bound to `session_id`.
    ///
    /// Returns immediately if a run is already in progress, or (after
    /// notifying the user) if there is no session id.
    pub async fn run(&self, session_id: Option<&str>) -> RunOutcome {
        if self.ctx.is_uploading() {
            tracing::debug!("upload run already in progress; ignoring");
            return RunOutcome::AlreadyRunning;
        }
        let Some(session_id) = session_id.filter(|s| !s.is_empty()) else {
            self.notifier.notify(NoticeLevel::Error, NO_SESSION_MESSAGE);
            return RunOutcome::NoSession;
        };
        let Some(_guard) = guard::RunGuard::acquire(&self.ctx) else {
            tracing::debug!("upload run already in progress; ignoring");
            return RunOutcome::AlreadyRunning;
        };

        let summary = self.run_snapshot(session_id).await;
        if summary.done + summary.failed > 0 {
            let level = if summary.failed > 0 {
                NoticeLevel::Error
            } else {
                NoticeLevel::Info
            };
            self.notifier.notify(
                level,
                &format!("{} uploaded, {} failed", summary.done, summary.failed),
            );
        }
        RunOutcome::Completed(summary)
    }

    /// `run` with whatever session id the push channel has supplied so far.
    pub async fn run_with_current_session(&self) -> RunOutcome {
        let session_id = self.ctx.session_id();
        self.run(session_id.as_deref()).await
    }

    fn limiter(&self) -> MutexGuard<'_, FixedWindowLimiter> {
        self.limiter.lock().unwrap_or_else(|e| e.into_inner())
    }
}

//! The body of a run: one item at a time, permit → transfer → terminal state.

use std::sync::Arc;

use super::summary::RunSummary;
use super::UploadOrchestrator;
use crate::queue::QueueState;
use crate::retry::{self, RetryDecision};
use crate::transfer::ProgressFn;

enum ItemOutcome {
    Done,
    Failed,
    Vanished,
}

impl UploadOrchestrator {
    pub(super) async fn run_snapshot(&self, session_id: &str) -> RunSummary {
        let pending = self.ctx.pending_ids();
        tracing::info!(items = pending.len(), "upload run started");

        let mut summary = RunSummary::default();
        for id in pending {
            match self.upload_item(&id, session_id).await {
                ItemOutcome::Done => summary.done += 1,
                ItemOutcome::Failed => summary.failed += 1,
                ItemOutcome::Vanished => summary.vanished += 1,
            }
        }

        tracing::info!(
            done = summary.done,
            failed = summary.failed,
            vanished = summary.vanished,
            "upload run finished"
        );
        summary
    }

    async fn upload_item(&self, id: &str, session_id: &str) -> ItemOutcome {
        let Some(file) = self.ctx.begin_upload(id) else {
            tracing::debug!(item = %id, "no longer pending; skipping");
            return ItemOutcome::Vanished;
        };

        let mut attempt = 1u32;
        loop {
            self.wait_for_permit(id).await;
            tracing::debug!(item = %id, attempt, "uploading");

            let err = match self
                .driver
                .transfer(&file, session_id, self.progress_fn(id))
                .await
            {
                Ok(()) => {
                    if !self.ctx.finish_item(id, QueueState::Done, None) {
                        tracing::debug!(item = %id, "uploaded after removal; result dropped");
                        return ItemOutcome::Vanished;
                    }
                    tracing::info!(item = %id, "upload done");
                    return ItemOutcome::Done;
                }
                Err(e) => e,
            };

            let kind = retry::classify(&err);
            match self.retry.decide(attempt, kind) {
                RetryDecision::RetryAfter(delay) if self.ctx.is_in_flight(id) => {
                    tracing::warn!(
                        item = %id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "upload failed, retrying: {}",
                        err
                    );
                    tokio::time::sleep(delay).await;
                    if !self.ctx.is_in_flight(id) {
                        return ItemOutcome::Vanished;
                    }
                    attempt += 1;
                }
                _ => {
                    if !self
                        .ctx
                        .finish_item(id, QueueState::Error, Some(err.to_string()))
                    {
                        tracing::debug!(item = %id, "failed after removal; result dropped: {}", err);
                        return ItemOutcome::Vanished;
                    }
                    tracing::warn!(item = %id, attempt, ?kind, "upload failed: {}", err);
                    return ItemOutcome::Failed;
                }
            }
        }
    }

    /// Check in with the limiter until a permit is granted.
    async fn wait_for_permit(&self, id: &str) {
        loop {
            let wait = self.limiter().check_in();
            if wait.is_zero() {
                return;
            }
            tracing::debug!(
                item = %id,
                wait_ms = wait.as_millis() as u64,
                "rate limit reached; waiting for next window"
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Progress callback bound to one item id. Writes after removal are no-ops.
    fn progress_fn(&self, id: &str) -> ProgressFn {
        let ctx = Arc::clone(&self.ctx);
        let id = id.to_string();
        Arc::new(move |pct| {
            ctx.raise_progress(&id, pct);
        })
    }
}

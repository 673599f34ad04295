//! Admission: dedup by fingerprint and the size gate.

use std::collections::HashSet;

use super::summary::AdmitSummary;
use crate::queue::{QueueItem, UploadFile, MAX_FILE_BYTES, OVERSIZE_MESSAGE};

/// Append `files` to `queue` in order. Files whose fingerprint is already
/// queued (or appeared earlier in the batch) are dropped; oversize files are
/// appended as skipped.
pub(super) fn admit_into(
    queue: &mut Vec<QueueItem>,
    files: impl IntoIterator<Item = UploadFile>,
) -> AdmitSummary {
    let mut seen: HashSet<String> = queue.iter().map(|i| i.id.clone()).collect();
    let mut summary = AdmitSummary::default();

    for file in files {
        let id = file.fingerprint();
        if !seen.insert(id.clone()) {
            tracing::debug!(item = %id, "already queued; ignoring");
            summary.duplicates += 1;
            continue;
        }
        if file.size() > MAX_FILE_BYTES {
            tracing::debug!(item = %id, size = file.size(), "over size limit; skipped");
            queue.push(QueueItem::skipped(file, OVERSIZE_MESSAGE));
            summary.skipped += 1;
        } else {
            tracing::debug!(item = %id, size = file.size(), "admitted");
            queue.push(QueueItem::pending(file));
            summary.added += 1;
        }
    }

    summary
}

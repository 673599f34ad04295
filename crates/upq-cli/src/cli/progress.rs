//! Throttled progress output while a run is in flight.

use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use upq_core::queue::{QueueItem, QueueState};

const PROGRESS_INTERVAL: Duration = Duration::from_millis(500);

/// Print a progress line on queue changes, at most once per interval.
/// `run` holds the ids the run will upload, in order.
pub fn spawn_progress_printer(
    mut queue: watch::Receiver<Vec<QueueItem>>,
    run: Vec<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last_print: Option<Instant> = None;
        let mut last_line = String::new();
        while queue.changed().await.is_ok() {
            let Some(line) = progress_line(&queue.borrow_and_update(), &run) else {
                continue;
            };
            let now = Instant::now();
            let due = last_print.map_or(true, |t| now.duration_since(t) >= PROGRESS_INTERVAL);
            if due && line != last_line {
                println!("  {line}");
                last_print = Some(now);
                last_line = line;
            }
        }
    })
}

/// `[n/total] name pct%` for the run item being uploaded, if any.
/// `n` is its position in `run`; other queue items are not counted.
pub fn progress_line(queue: &[QueueItem], run: &[String]) -> Option<String> {
    let current = queue
        .iter()
        .find(|i| i.state == QueueState::Uploading && run.contains(&i.id))?;
    let position = run.iter().position(|id| *id == current.id)? + 1;
    Some(format!(
        "[{}/{}] {} {:>3}%",
        position,
        run.len(),
        current.file.name(),
        current.progress
    ))
}

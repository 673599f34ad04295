//! `upq upload` – queue files, obtain a session, run once, report.

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use upq_core::config::UpqConfig;
use upq_core::context::UploadContext;
use upq_core::orchestrator::{RunOutcome, UploadOrchestrator};
use upq_core::queue::{QueueItem, QueueState, UploadFile};
use upq_core::session::{SessionChannel, WsConnector};
use upq_core::transfer::CurlTransferDriver;

use crate::cli::notifier::PrintNotifier;
use crate::cli::progress::spawn_progress_printer;

pub async fn run_upload(
    cfg: &UpqConfig,
    paths: &[PathBuf],
    session: Option<String>,
    wait: Duration,
) -> Result<()> {
    let endpoints = cfg.endpoints()?;
    let ctx = Arc::new(UploadContext::new());
    let driver = CurlTransferDriver::new(endpoints.upload_url(), cfg.curl_options());
    let orch = UploadOrchestrator::new(Arc::clone(&ctx), Arc::new(driver), cfg.rate_policy())
        .with_retry(cfg.retry_policy())
        .with_notifier(Arc::new(PrintNotifier));

    let files = paths
        .iter()
        .map(UploadFile::from_path)
        .collect::<Result<Vec<_>>>()?;
    let admitted = orch.admit(files);
    println!(
        "Queued {} file(s) ({} skipped, {} duplicate).",
        admitted.added, admitted.skipped, admitted.duplicates
    );

    let channel = match session {
        Some(id) => {
            ctx.set_session_id(id);
            None
        }
        None => {
            let connector = WsConnector::new(Duration::from_secs(cfg.connect_timeout_secs));
            let handle =
                SessionChannel::new(Arc::new(connector), endpoints.ws_url(), Arc::clone(&ctx))
                    .with_reconnect_delay(cfg.reconnect_delay())
                    .spawn();
            wait_for_session(&ctx, wait).await;
            Some(handle)
        }
    };

    let run_ids = ctx
        .queue()
        .into_iter()
        .filter(|i| i.state == QueueState::Pending)
        .map(|i| i.id)
        .collect();
    let progress = spawn_progress_printer(ctx.subscribe_queue(), run_ids);
    let outcome = orch.run_with_current_session().await;
    progress.abort();
    if let Some(handle) = channel {
        handle.shutdown().await;
    }

    print_queue(&ctx.queue());
    match outcome {
        RunOutcome::NoSession => bail!("no session id within {}s", wait.as_secs()),
        RunOutcome::AlreadyRunning => bail!("an upload run is already in progress"),
        RunOutcome::Completed(summary) if summary.failed > 0 => {
            bail!("{} upload(s) failed", summary.failed)
        }
        RunOutcome::Completed(_) => Ok(()),
    }
}

async fn wait_for_session(ctx: &UploadContext, wait: Duration) {
    println!("Waiting up to {}s for a session id...", wait.as_secs());
    let mut session = ctx.subscribe_session_id();
    let got = tokio::time::timeout(
        wait,
        session.wait_for(|id| id.as_deref().is_some_and(|s| !s.is_empty())),
    )
    .await;
    match got {
        Ok(Ok(_)) => tracing::debug!("session id received"),
        _ => tracing::warn!(wait_secs = wait.as_secs(), "no session id received"),
    }
}

fn print_queue(queue: &[QueueItem]) {
    if queue.is_empty() {
        println!("Nothing queued.");
        return;
    }
    println!("{:<10} {:>4}  {:<32} {}", "STATE", "PCT", "FILE", "ERROR");
    for item in queue {
        println!(
            "{:<10} {:>3}%  {:<32} {}",
            item.state,
            item.progress,
            item.file.name(),
            item.error.as_deref().unwrap_or("")
        );
    }
}

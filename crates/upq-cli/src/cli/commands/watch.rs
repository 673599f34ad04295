//! `upq watch` – follow the push channel until Ctrl-C.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use upq_core::config::UpqConfig;
use upq_core::context::UploadContext;
use upq_core::session::{SessionChannel, WsConnector};

pub async fn run_watch(cfg: &UpqConfig) -> Result<()> {
    let ws_url = cfg.endpoints()?.ws_url();
    let ctx = Arc::new(UploadContext::new());
    let connector = WsConnector::new(Duration::from_secs(cfg.connect_timeout_secs));
    let channel = SessionChannel::new(Arc::new(connector), ws_url.clone(), Arc::clone(&ctx))
        .with_reconnect_delay(cfg.reconnect_delay())
        .spawn();

    let mut session = ctx.subscribe_session_id();
    let mut status = ctx.subscribe_status();
    println!("watching {ws_url} (Ctrl-C to stop)");
    println!("status: {}", *status.borrow_and_update());

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = session.changed() => {
                if changed.is_err() {
                    break;
                }
                let id = session.borrow_and_update().clone();
                println!("session: {}", id.as_deref().unwrap_or("-"));
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("status: {}", *status.borrow_and_update());
            }
        }
    }

    channel.shutdown().await;
    Ok(())
}

//! Integration test: full run from push-channel session to uploads.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::push_server::{PushServer, Session};
use common::upload_server::UploadServer;
use tokio::time::timeout;
use upq_core::context::UploadContext;
use upq_core::endpoints::Endpoints;
use upq_core::orchestrator::{RunOutcome, RunSummary, UploadOrchestrator};
use upq_core::queue::{QueueState, UploadFile};
use upq_core::rate_limit::RatePolicy;
use upq_core::session::{SessionChannel, WsConnector};
use upq_core::transfer::{CurlOptions, CurlTransferDriver};

fn orchestrator(ctx: &Arc<UploadContext>, base: &str) -> UploadOrchestrator {
    let endpoints = Endpoints::new(base).unwrap();
    let driver = CurlTransferDriver::new(endpoints.upload_url(), CurlOptions::default());
    UploadOrchestrator::new(Arc::clone(ctx), Arc::new(driver), RatePolicy::default())
}

#[tokio::test]
async fn middle_failure_does_not_stop_the_batch() {
    let server = UploadServer::start(vec![
        (200, r#"{"ok":true}"#),
        (415, r#"{"detail":"Unsupported media type"}"#),
        (200, r#"{"ok":true}"#),
    ]);
    let ctx = Arc::new(UploadContext::new());
    let orch = orchestrator(&ctx, &server.base);
    orch.admit([
        UploadFile::from_bytes("1.jpg", vec![1; 100], 10),
        UploadFile::from_bytes("2.exe", vec![2; 100], 10),
        UploadFile::from_bytes("3.jpg", vec![3; 100], 10),
    ]);

    let outcome = orch.run(Some("sess")).await;
    assert_eq!(
        outcome,
        RunOutcome::Completed(RunSummary { done: 2, failed: 1, vanished: 0 })
    );

    let queue = ctx.queue();
    let states: Vec<QueueState> = queue.iter().map(|i| i.state).collect();
    assert_eq!(states, [QueueState::Done, QueueState::Error, QueueState::Done]);
    assert_eq!(queue[1].error.as_deref(), Some("Unsupported media type"));
    assert_eq!(queue[0].progress, 100);

    let names: Vec<String> = server
        .requests()
        .iter()
        .map(|r| r.part("file").unwrap().filename.unwrap())
        .collect();
    assert_eq!(names, ["1.jpg", "2.exe", "3.jpg"]);
    assert!(!ctx.is_uploading());

    assert_eq!(orch.clear_done(), 2);
    assert_eq!(ctx.queue().len(), 1);
}

#[tokio::test]
async fn session_from_push_channel_is_sent_with_uploads() {
    let push = PushServer::start(vec![Session::SendAndHold(vec![
        r#"{"sessionId":"tg-777","status":"linked"}"#.to_string(),
    ])])
    .await;
    let uploads = UploadServer::start(vec![]);

    let ctx = Arc::new(UploadContext::new());
    let orch = orchestrator(&ctx, &uploads.base);
    orch.admit([UploadFile::from_bytes("a.png", vec![0; 32], 1)]);
    assert_eq!(orch.run_with_current_session().await, RunOutcome::NoSession);

    let channel = SessionChannel::new(Arc::new(WsConnector::default()), push.url.clone(), Arc::clone(&ctx))
        .spawn();
    timeout(
        Duration::from_secs(10),
        ctx.subscribe_session_id().wait_for(|s| s.is_some()),
    )
    .await
    .expect("session id arrives")
    .unwrap();

    let outcome = orch.run_with_current_session().await;
    assert_eq!(
        outcome,
        RunOutcome::Completed(RunSummary { done: 1, failed: 0, vanished: 0 })
    );
    let part = uploads.requests()[0].part("sessionId").unwrap();
    assert_eq!(part.data, b"tg-777");
    channel.shutdown().await;
}

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::connector::{Connector, FrameStream};
use super::error::ChannelError;
use super::frame;
use crate::context::UploadContext;

pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// Status cell value while connected.
pub const STATUS_CONNECTED: &str = "connected";
/// Status cell value between a disconnect and the next attempt.
pub const STATUS_RECONNECTING: &str = "disconnected; reconnecting...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Connected,
    Disconnected,
}

/// Receive-only push channel writing into the shared context.
///
/// Reconnects after a fixed delay, forever, until the owning
/// [`ChannelHandle`] is shut down or dropped.
pub struct SessionChannel {
    connector: Arc<dyn Connector>,
    url: String,
    ctx: Arc<UploadContext>,
    reconnect_delay: Duration,
}

impl SessionChannel {
    pub fn new(connector: Arc<dyn Connector>, url: impl Into<String>, ctx: Arc<UploadContext>) -> Self {
        Self {
            connector,
            url: url.into(),
            ctx,
            reconnect_delay: DEFAULT_RECONNECT_DELAY,
        }
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Start the connection loop on the current runtime.
    pub fn spawn(self) -> ChannelHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (state_tx, state_rx) = watch::channel(ChannelState::Connecting);
        let task = tokio::spawn(self.run(state_tx, shutdown_rx));
        ChannelHandle {
            shutdown: shutdown_tx,
            state: state_rx,
            task,
        }
    }

    async fn run(self, state: watch::Sender<ChannelState>, mut shutdown: watch::Receiver<bool>) {
        let mut attempt = 0u64;
        loop {
            attempt += 1;
            state.send_replace(ChannelState::Connecting);
            tracing::debug!(url = %self.url, attempt, "connecting push channel");

            let connected = tokio::select! {
                _ = stopped(&mut shutdown) => break,
                r = self.connector.connect(&self.url) => r,
            };
            match connected {
                Ok(frames) => {
                    self.ctx.set_status(STATUS_CONNECTED);
                    state.send_replace(ChannelState::Connected);
                    tracing::info!(url = %self.url, "push channel connected");

                    let lost = tokio::select! {
                        _ = stopped(&mut shutdown) => break,
                        lost = self.pump(frames) => lost,
                    };
                    match lost {
                        Some(e) => tracing::warn!(error = %e, "push channel lost"),
                        None => tracing::warn!("push channel closed by server"),
                    }
                }
                Err(e) => tracing::warn!(error = %e, attempt, "push channel connect failed"),
            }

            self.ctx.set_status(STATUS_RECONNECTING);
            state.send_replace(ChannelState::Disconnected);
            tracing::debug!(
                delay_ms = self.reconnect_delay.as_millis() as u64,
                "reconnect scheduled"
            );
            tokio::select! {
                _ = stopped(&mut shutdown) => break,
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }
        state.send_replace(ChannelState::Disconnected);
        tracing::debug!("push channel stopped");
    }

    /// Apply frames until the stream ends (`None`) or fails.
    async fn pump(&self, mut frames: FrameStream) -> Option<ChannelError> {
        while let Some(item) = frames.next().await {
            match item {
                Ok(text) => {
                    frame::handle_text(&self.ctx, &text);
                }
                Err(e) => return Some(e),
            }
        }
        None
    }
}

/// Resolves once shutdown is requested or the handle is gone.
async fn stopped(rx: &mut watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Owns a running [`SessionChannel`]. Dropping it stops the channel too.
pub struct ChannelHandle {
    shutdown: watch::Sender<bool>,
    state: watch::Receiver<ChannelState>,
    task: JoinHandle<()>,
}

impl ChannelHandle {
    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<ChannelState> {
        self.state.clone()
    }

    /// Stop the loop, wherever it is, and wait for the task to exit.
    pub async fn shutdown(self) {
        self.shutdown.send_replace(true);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "push channel task ended abnormally");
        }
    }
}

use std::time::Duration;

use async_trait::async_trait;
use futures::future;
use futures::stream::{BoxStream, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::error::ChannelError;

/// Text frames of one connection. The stream ends when the server closes it;
/// an `Err` item means the connection was lost.
pub type FrameStream = BoxStream<'static, Result<String, ChannelError>>;

/// Opens push-channel connections.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, url: &str) -> Result<FrameStream, ChannelError>;
}

/// WebSocket connector. Receive-only: binary, ping and pong frames are
/// dropped; a close frame ends the stream.
#[derive(Debug, Clone, Copy)]
pub struct WsConnector {
    connect_timeout: Duration,
}

impl WsConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Default for WsConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> Result<FrameStream, ChannelError> {
        let (ws, _response) = tokio::time::timeout(self.connect_timeout, connect_async(url))
            .await
            .map_err(|_| ChannelError::ConnectTimeout(self.connect_timeout))?
            .map_err(ChannelError::Connect)?;

        let frames = ws
            .take_while(|msg| future::ready(!matches!(msg, Ok(Message::Close(_)))))
            .filter_map(|msg| {
                future::ready(match msg {
                    Ok(Message::Text(text)) => Some(Ok(text.as_str().to_owned())),
                    Ok(_) => None,
                    Err(e) => Some(Err(ChannelError::Stream(e))),
                })
            });
        Ok(frames.boxed())
    }
}

use std::time::Duration;

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Why a push-channel connection could not be opened or was lost.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("connect failed: {0}")]
    Connect(#[source] tungstenite::Error),
    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),
    #[error("stream error: {0}")]
    Stream(#[source] tungstenite::Error),
}

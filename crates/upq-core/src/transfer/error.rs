//! Transfer outcome errors.

/// Message used for every transport-level failure.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error occurred";

/// Why a transfer failed. `Display` is the message recorded on the queue item.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Server answered with a non-2xx status.
    #[error("{message}")]
    Http { status: u32, message: String },
    /// Connection refused, reset, timed out, aborted...
    #[error("Network error occurred")]
    Network { detail: String },
    /// Request could not be built (unreadable file, bad URL, worker panic).
    #[error("upload setup failed: {0}")]
    Setup(String),
}

impl TransferError {
    /// HTTP status, when the failure came from the server.
    pub fn status(&self) -> Option<u32> {
        match self {
            TransferError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<curl::Error> for TransferError {
    fn from(e: curl::Error) -> Self {
        TransferError::Network {
            detail: e.to_string(),
        }
    }
}

impl From<curl::FormError> for TransferError {
    fn from(e: curl::FormError) -> Self {
        TransferError::Setup(e.to_string())
    }
}

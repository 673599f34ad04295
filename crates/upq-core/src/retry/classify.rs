//! Classify HTTP status and transfer errors into retry policy error kinds.

use crate::retry::policy::ErrorKind;
use crate::transfer::TransferError;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a transfer error into an ErrorKind.
pub fn classify(e: &TransferError) -> ErrorKind {
    match e {
        TransferError::Http { status, .. } => classify_http_status(*status),
        TransferError::Network { .. } => ErrorKind::Connection,
        TransferError::Setup(_) => ErrorKind::Other,
    }
}

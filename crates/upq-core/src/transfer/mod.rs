//! One file's transfer to the upload endpoint.
//!
//! `POST <base>/upload` with a multipart body of `sessionId` and `file`.
//! The driver reports upload progress through a callback and classifies the
//! outcome; it never retries. Retry, if any, is the orchestrator's call.

mod curl_driver;
mod error;
mod progress;
mod response;

use async_trait::async_trait;
use std::sync::Arc;

use crate::queue::UploadFile;

pub use curl_driver::{CurlOptions, CurlTransferDriver};
pub use error::{TransferError, NETWORK_ERROR_MESSAGE};
pub use progress::{percent_complete, ProgressTracker};
pub use response::{classify_response, error_message_from_body};

/// Progress callback: receives percent complete (0..=100), non-decreasing.
/// May be called from a blocking worker thread.
pub type ProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

#[async_trait]
pub trait TransferDriver: Send + Sync {
    /// Upload `file` bound to `session_id`. Completes exactly once.
    async fn transfer(
        &self,
        file: &UploadFile,
        session_id: &str,
        on_progress: ProgressFn,
    ) -> Result<(), TransferError>;
}

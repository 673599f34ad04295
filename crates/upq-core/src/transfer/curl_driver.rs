//! Multipart upload over libcurl.
//!
//! Runs the blocking curl transfer on tokio's blocking pool and forwards
//! upload progress from curl's progress callback.

use async_trait::async_trait;
use curl::easy::{Easy, Form};
use std::time::Duration;

use super::error::TransferError;
use super::progress::ProgressTracker;
use super::response::classify_response;
use super::{ProgressFn, TransferDriver};
use crate::queue::{FileSource, UploadFile};

/// curl knobs applied to every upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Whole-request limit; None means no limit.
    pub timeout: Option<Duration>,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Some(Duration::from_secs(300)),
        }
    }
}

/// Production driver: `POST <upload_url>` with `sessionId` and `file` parts.
#[derive(Debug, Clone)]
pub struct CurlTransferDriver {
    upload_url: String,
    options: CurlOptions,
}

impl CurlTransferDriver {
    pub fn new(upload_url: impl Into<String>, options: CurlOptions) -> Self {
        Self {
            upload_url: upload_url.into(),
            options,
        }
    }

    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }
}

#[async_trait]
impl TransferDriver for CurlTransferDriver {
    async fn transfer(
        &self,
        file: &UploadFile,
        session_id: &str,
        on_progress: ProgressFn,
    ) -> Result<(), TransferError> {
        let url = self.upload_url.clone();
        let file = file.clone();
        let session_id = session_id.to_string();
        let options = self.options;
        tokio::task::spawn_blocking(move || {
            post_multipart(&url, &file, &session_id, options, &on_progress)
        })
        .await
        .map_err(|e| TransferError::Setup(format!("upload task join: {e}")))?
    }
}

/// Blocking multipart POST. Returns once the response has been read.
fn post_multipart(
    url: &str,
    file: &UploadFile,
    session_id: &str,
    options: CurlOptions,
    on_progress: &ProgressFn,
) -> Result<(), TransferError> {
    let mut form = Form::new();
    form.part("sessionId").contents(session_id.as_bytes()).add()?;
    match file.source() {
        FileSource::Path(path) => {
            if !path.is_file() {
                return Err(TransferError::Setup(format!(
                    "cannot read {}",
                    path.display()
                )));
            }
            form.part("file").file(path).filename(file.name()).add()?;
        }
        FileSource::Memory(data) => {
            form.part("file").buffer(file.name(), data.to_vec()).add()?;
        }
    }

    let mut easy = Easy::new();
    easy.url(url)
        .map_err(|e| TransferError::Setup(format!("invalid upload URL {url}: {e}")))?;
    easy.connect_timeout(options.connect_timeout)?;
    if let Some(t) = options.timeout {
        easy.timeout(t)?;
    }
    easy.progress(true)?;
    easy.httppost(form)?;

    let mut body = Vec::new();
    let mut tracker = ProgressTracker::new();
    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.progress_function(|_dltotal, _dlnow, ultotal, ulnow| {
            if let Some(pct) = tracker.observe(ulnow as u64, ultotal as u64) {
                on_progress(pct);
            }
            true
        })?;
        transfer.perform()
    };

    if let Err(e) = performed {
        tracing::warn!(url, file = %file.name(), "upload transport failure: {}", e);
        return Err(e.into());
    }

    let status = easy.response_code()?;
    tracing::debug!(url, file = %file.name(), status, "upload response");
    classify_response(status, &body)
}

//! Queue data model: upload candidates and their per-item state.

mod file;
mod item;

pub use file::{FileSource, UploadFile};
pub use item::{QueueItem, QueueState};

/// Admission threshold: files larger than this are marked skipped and never sent.
pub const MAX_FILE_BYTES: u64 = 8 * 1024 * 1024;

/// Error recorded on an item skipped for size.
pub const OVERSIZE_MESSAGE: &str = "Max file size is 8MB";

//! Upload payload handle.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Where the bytes of an upload come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Read from disk at transfer time.
    Path(PathBuf),
    /// Held in memory.
    Memory(Arc<[u8]>),
}

/// A file admitted (or about to be admitted) to the queue.
///
/// Name, size and modification time are captured once so the fingerprint is
/// stable even if the file changes on disk later.
#[derive(Debug, Clone)]
pub struct UploadFile {
    name: String,
    size: u64,
    last_modified_ms: u64,
    source: FileSource,
}

impl UploadFile {
    /// Stat a file on disk. The upload name is the final path component.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path)
            .with_context(|| format!("stat {}", path.display()))?;
        if !meta.is_file() {
            anyhow::bail!("{} is not a regular file", path.display());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow::anyhow!("{} has no file name", path.display()))?;
        let last_modified_ms = meta.modified().map(millis_since_epoch).unwrap_or(0);

        Ok(Self {
            name,
            size: meta.len(),
            last_modified_ms,
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// Wrap an in-memory payload.
    pub fn from_bytes(name: impl Into<String>, data: impl Into<Vec<u8>>, last_modified_ms: u64) -> Self {
        let data: Arc<[u8]> = Arc::from(data.into());
        Self {
            name: name.into(),
            size: data.len() as u64,
            last_modified_ms,
            source: FileSource::Memory(data),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn last_modified_ms(&self) -> u64 {
        self.last_modified_ms
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Queue identity: `name|size|last_modified_ms`.
    pub fn fingerprint(&self) -> String {
        format!("{}|{}|{}", self.name, self.size, self.last_modified_ms)
    }
}

fn millis_since_epoch(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

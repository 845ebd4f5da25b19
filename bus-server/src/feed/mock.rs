//! File-backed feed source for development and testing.
//!
//! Serves a saved `trips.bin` (or in-memory bytes) as if it were the live
//! endpoint, so the server can run without network access.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::error::FeedError;
use super::source::FeedSource;

/// Where a [`StaticFeed`] gets its bytes.
#[derive(Debug, Clone)]
enum Origin {
    Memory(Vec<u8>),
    File(PathBuf),
}

/// Feed source that serves fixed bytes or re-reads a local file.
///
/// A file is read on every fetch, so replacing it on disk is picked up by the
/// next request just like a refreshed remote feed would be.
#[derive(Debug, Clone)]
pub struct StaticFeed {
    origin: Origin,
}

impl StaticFeed {
    /// Serve the given bytes on every fetch.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            origin: Origin::Memory(bytes.into()),
        }
    }

    /// Serve the contents of a local file.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            origin: Origin::File(path.as_ref().to_path_buf()),
        }
    }
}

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch(&self) -> Result<Vec<u8>, FeedError> {
        match &self.origin {
            Origin::Memory(bytes) => Ok(bytes.clone()),
            Origin::File(path) => tokio::fs::read(path).await.map_err(|source| FeedError::Io {
                path: path.clone(),
                source,
            }),
        }
    }

    fn describe(&self) -> String {
        match &self.origin {
            Origin::Memory(bytes) => format!("<{} in-memory bytes>", bytes.len()),
            Origin::File(path) => path.display().to_string(),
        }
    }
}

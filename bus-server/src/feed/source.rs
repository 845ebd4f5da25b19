//! Feed source abstraction.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::FeedSnapshot;

use super::decode::decode;
use super::error::FeedError;

/// Anything that can produce the raw bytes of the current feed.
///
/// Implementations never cache between calls on behalf of the caller: each
/// `fetch` is expected to return whatever the source currently publishes.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Retrieve the raw feed bytes.
    async fn fetch(&self) -> Result<Vec<u8>, FeedError>;

    /// Human-readable location of the feed, for logs.
    fn describe(&self) -> String;
}

/// Fetch and decode one snapshot from `source`.
pub async fn load_snapshot(source: &dyn FeedSource) -> Result<FeedSnapshot, FeedError> {
    let bytes = source.fetch().await?;
    let snapshot = decode(&bytes)?;

    debug!(
        source = %source.describe(),
        bytes = bytes.len(),
        entities = snapshot.len(),
        "Loaded feed snapshot"
    );

    Ok(snapshot)
}

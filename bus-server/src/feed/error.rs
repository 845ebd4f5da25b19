//! Feed error types.

use std::path::PathBuf;

/// Errors from fetching or decoding the real-time feed.
///
/// Everything except [`FeedError::Decode`] and [`FeedError::MissingHeader`]
/// is a transport failure: the bytes never arrived.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed endpoint answered with a non-success status
    #[error("feed endpoint returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Local feed file could not be read
    #[error("could not read feed file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bytes arrived but are not a GTFS-Realtime feed message
    #[error("malformed feed: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Bytes parsed but carry no feed header, e.g. an empty body
    #[error("malformed feed: missing header")]
    MissingHeader,
}

impl FeedError {
    /// Whether this error happened after the bytes were retrieved.
    pub fn is_decode(&self) -> bool {
        matches!(self, FeedError::Decode(_) | FeedError::MissingHeader)
    }
}

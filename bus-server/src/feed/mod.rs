//! Real-time feed access.
//!
//! This module fetches the GTFS-Realtime `TripUpdates` feed and decodes it
//! into a [`FeedSnapshot`](crate::domain::FeedSnapshot).
//!
//! Key characteristics of the feed:
//! - It is a protobuf `FeedMessage`; entities other than trip updates are
//!   mixed in and ignored
//! - Stop identifiers are zero-padded (`"000108"`) while callers usually
//!   are not
//! - The route id is frequently unset; the line is encoded as the prefix of
//!   the trip id (`"211.1"`)
//! - A snapshot is fetched fresh for every request and never cached

mod client;
mod decode;
mod error;
mod mock;
mod source;

pub use client::{DEFAULT_FEED_TIMEOUT_SECS, DEFAULT_FEED_URL, FeedClient, FeedConfig};
pub use decode::{convert_message, decode};
pub use error::FeedError;
pub use mock::StaticFeed;
pub use source::{FeedSource, load_snapshot};

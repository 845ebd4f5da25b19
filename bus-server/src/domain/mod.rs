//! Domain types for the bus arrival server.
//!
//! These types describe a decoded real-time feed independently of its wire
//! format. Stop identifiers are normalized at construction, so code holding a
//! `StopId` can compare it directly against raw feed values.

mod snapshot;
mod stop;

pub use snapshot::{
    EventKind, FeedSnapshot, StopEvent, StopEventRecord, TripUpdateEntity, line_of,
};
pub use stop::{InvalidStopId, StopId, normalize};

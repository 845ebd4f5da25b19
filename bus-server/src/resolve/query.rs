//! Resolution inputs and outputs.

use serde::Serialize;

use crate::domain::{EventKind, StopId};

/// What the caller is asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalQuery {
    /// Stop to look up.
    pub stop: StopId,

    /// Prefix of the trip identifier (e.g. `"211."`). `None` matches every
    /// trip.
    line_prefix: Option<String>,

    /// Reference time (Unix seconds).
    pub now: i64,
}

impl ArrivalQuery {
    /// Create a query for any line at `stop`.
    pub fn new(stop: StopId, now: i64) -> Self {
        Self {
            stop,
            line_prefix: None,
            now,
        }
    }

    /// Restrict the first pass to trips whose id starts with `prefix`.
    ///
    /// An empty prefix is the same as no prefix.
    pub fn with_line_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.line_prefix = if prefix.is_empty() { None } else { Some(prefix) };
        self
    }

    /// The line prefix, if one was given.
    pub fn line_prefix(&self) -> Option<&str> {
        self.line_prefix.as_deref()
    }
}

/// The nearest qualifying event for a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrivalResult {
    /// Whole minutes until the event, rounded half-to-even.
    pub minutes_until: u32,

    /// Line of the trip that produced the event.
    pub line: String,

    /// The stop that was searched for.
    pub stop: StopId,

    /// The stop identifier exactly as the feed spelled it.
    pub feed_stop_id: String,

    /// Trip that produced the event.
    pub trip_id: String,

    /// Whether the time came from the arrival or the departure prediction.
    pub event: EventKind,

    /// Absolute event time (Unix seconds).
    pub event_time: i64,

    /// Reported delay for that event, in seconds.
    pub delay: Option<i32>,

    /// True when the requested line had nothing and the search was widened
    /// to every line.
    pub via_fallback: bool,
}

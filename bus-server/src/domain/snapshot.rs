//! Decoded real-time feed snapshot.
//!
//! A snapshot is built once per request from the raw feed bytes and is never
//! mutated afterwards. Identifier strings are kept exactly as the feed
//! published them; normalization only happens when comparing.

use serde::Serialize;

/// One decoded feed fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedSnapshot {
    /// Feed header timestamp (Unix seconds), if the publisher set one.
    pub timestamp: Option<u64>,

    /// Trip update entities in feed order.
    pub entities: Vec<TripUpdateEntity>,
}

impl FeedSnapshot {
    /// Create a snapshot from already-decoded entities.
    pub fn new(timestamp: Option<u64>, entities: Vec<TripUpdateEntity>) -> Self {
        Self {
            timestamp,
            entities,
        }
    }

    /// Entities whose trip identifier starts with `prefix`.
    pub fn entities_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a TripUpdateEntity> + 'a {
        self.entities
            .iter()
            .filter(move |e| e.trip_id.starts_with(prefix))
    }

    /// Sorted, distinct raw stop identifiers across all entities.
    pub fn stop_ids(&self) -> Vec<&str> {
        let mut stops: Vec<&str> = self
            .entities
            .iter()
            .flat_map(|e| e.stop_events.iter().map(|r| r.stop_id.as_str()))
            .collect();
        stops.sort_unstable();
        stops.dedup();
        stops
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }
}

/// Real-time update for one trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TripUpdateEntity {
    /// Feed entity id.
    pub entity_id: String,

    /// Trip identifier. Empty when the feed omitted it.
    pub trip_id: String,

    /// Route identifier. Many feeds leave this unset and only encode the
    /// line in the trip identifier, so it is informational only.
    pub route_id: Option<String>,

    /// Per-stop predictions in feed order.
    pub stop_events: Vec<StopEventRecord>,
}

impl TripUpdateEntity {
    /// The line this trip belongs to, derived from the trip identifier.
    ///
    /// Trip ids look like `"211.1"`: everything before the first `.` is the
    /// line. Without a `.` the whole trip id is used.
    pub fn line(&self) -> &str {
        line_of(&self.trip_id)
    }
}

/// Line portion of a trip identifier.
pub fn line_of(trip_id: &str) -> &str {
    match trip_id.split_once('.') {
        Some((line, _)) => line,
        None => trip_id,
    }
}

/// Arrival/departure prediction for one stop along one trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StopEventRecord {
    /// Stop identifier as published (possibly zero-padded).
    pub stop_id: String,

    /// Position of the stop within the trip.
    pub stop_sequence: Option<u32>,

    pub arrival: Option<StopEvent>,

    pub departure: Option<StopEvent>,
}

impl StopEventRecord {
    /// The time used for resolution: arrival if it has an absolute time,
    /// otherwise departure.
    pub fn event_time(&self) -> Option<(EventKind, i64)> {
        let arrival = self
            .arrival
            .as_ref()
            .and_then(|e| e.time)
            .map(|t| (EventKind::Arrival, t));

        arrival.or_else(|| {
            self.departure
                .as_ref()
                .and_then(|e| e.time)
                .map(|t| (EventKind::Departure, t))
        })
    }
}

/// A predicted arrival or departure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StopEvent {
    /// Absolute time (Unix seconds).
    pub time: Option<i64>,

    /// Delay relative to schedule, in seconds.
    pub delay: Option<i32>,
}

impl StopEvent {
    pub fn at(time: i64) -> Self {
        Self {
            time: Some(time),
            delay: None,
        }
    }
}

/// Which side of a stop visit produced a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Arrival,
    Departure,
}

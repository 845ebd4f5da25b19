//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{EventKind, FeedSnapshot, StopEventRecord, TripUpdateEntity};
use crate::reference::StopNames;
use crate::resolve::{ArrivalResult, StopVisit, minutes_until};

/// Number of trips sampled by the feed summary.
const TRIP_SAMPLE_SIZE: usize = 5;

/// Query parameters for `/bus_time`.
#[derive(Debug, Default, Deserialize)]
pub struct BusTimeRequest {
    /// Stop identifier, zero-padded or not
    pub stop: Option<String>,

    /// Prefix of the trip identifier, e.g. `"211."`
    pub line_prefix: Option<String>,
}

/// Next arrival at a stop.
#[derive(Debug, Serialize)]
pub struct BusTimeResponse {
    /// Line of the trip that will arrive
    pub line: String,

    /// Normalized stop identifier
    pub stop: String,

    /// Stop display name (the raw identifier when unknown)
    pub stop_name: String,

    /// Whole minutes until arrival
    pub arrival_min: u32,

    /// Trip that will arrive
    pub trip_id_found: String,

    /// Whether the time is an arrival or departure prediction
    pub event: EventKind,

    /// Reported delay in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_sec: Option<i32>,

    /// True when the requested line had nothing and another line answered
    pub fallback: bool,
}

/// Summary of the current feed.
#[derive(Debug, Serialize)]
pub struct FeedSummaryResponse {
    /// Number of trip update entities
    pub trip_updates_found: usize,

    /// Feed header timestamp (Unix seconds)
    pub feed_timestamp: Option<u64>,

    /// First few trips, for eyeballing identifier formats
    pub trip_descriptor_samples: Vec<TripSample>,

    /// Sorted distinct stop identifiers
    pub available_stops: Vec<String>,
}

/// Trip identifiers of one entity.
#[derive(Debug, Serialize)]
pub struct TripSample {
    pub trip_id: String,
    pub route_id: Option<String>,
}

/// Raw dump of one trip update.
#[derive(Debug, Serialize)]
pub struct TripDump {
    pub entity_id: String,
    pub trip_id: String,
    pub route_id: Option<String>,
    pub line: String,
    pub stop_events: Vec<StopEventRecord>,
}

/// All trips matching a line prefix.
#[derive(Debug, Serialize)]
pub struct LineDumpResponse {
    pub prefix: String,
    pub trips: Vec<TripDump>,
}

/// One trip's prediction at a stop.
#[derive(Debug, Serialize)]
pub struct StopVisitDump {
    pub trip_id: String,
    pub line: String,
    #[serde(flatten)]
    pub record: StopEventRecord,
    /// Minutes until the event, when it is still upcoming
    pub minutes_until: Option<u32>,
}

/// All predictions at a stop.
#[derive(Debug, Serialize)]
pub struct StopDumpResponse {
    pub stop: String,
    pub stop_name: String,
    pub visits: Vec<StopVisitDump>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Stop that was searched for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,

    /// Line prefix that was searched for
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
}

// Conversion implementations

impl BusTimeResponse {
    /// Create from a resolution result.
    pub fn from_result(result: ArrivalResult, names: &StopNames) -> Self {
        let stop_name = names.lookup(&result.feed_stop_id).to_string();

        Self {
            line: result.line,
            stop: result.stop.to_string(),
            stop_name,
            arrival_min: result.minutes_until,
            trip_id_found: result.trip_id,
            event: result.event,
            delay_sec: result.delay,
            fallback: result.via_fallback,
        }
    }
}

impl FeedSummaryResponse {
    /// Summarize a snapshot.
    pub fn from_snapshot(snapshot: &FeedSnapshot) -> Self {
        Self {
            trip_updates_found: snapshot.len(),
            feed_timestamp: snapshot.timestamp,
            trip_descriptor_samples: snapshot
                .entities
                .iter()
                .take(TRIP_SAMPLE_SIZE)
                .map(|e| TripSample {
                    trip_id: e.trip_id.clone(),
                    route_id: e.route_id.clone(),
                })
                .collect(),
            available_stops: snapshot.stop_ids().into_iter().map(str::to_string).collect(),
        }
    }
}

impl TripDump {
    pub fn from_entity(entity: &TripUpdateEntity) -> Self {
        Self {
            entity_id: entity.entity_id.clone(),
            trip_id: entity.trip_id.clone(),
            route_id: entity.route_id.clone(),
            line: entity.line().to_string(),
            stop_events: entity.stop_events.clone(),
        }
    }
}

impl StopVisitDump {
    pub fn from_visit(visit: &StopVisit<'_>, now: i64) -> Self {
        Self {
            trip_id: visit.entity.trip_id.clone(),
            line: visit.entity.line().to_string(),
            record: visit.record.clone(),
            minutes_until: visit
                .record
                .event_time()
                .and_then(|(_, time)| minutes_until(time, now)),
        }
    }
}

//! GTFS-Realtime protobuf decoding.
//!
//! Converts the generated `transit_realtime` message types into the
//! wire-independent [`FeedSnapshot`]. Only trip updates are kept; vehicle
//! positions, alerts and other entity kinds are skipped.

use prost::Message;

use crate::domain::{FeedSnapshot, StopEvent, StopEventRecord, TripUpdateEntity};
use crate::gtfs_rt::{FeedEntity, FeedMessage, trip_update};

use super::error::FeedError;

/// Decode raw feed bytes into a snapshot.
///
/// # Errors
///
/// Returns [`FeedError::Decode`] if the bytes are not a valid protobuf
/// `FeedMessage`, and [`FeedError::MissingHeader`] if they parse but carry no
/// `gtfs_realtime_version`. prost does not enforce proto2 `required`, so an
/// empty buffer would otherwise decode to an empty feed.
pub fn decode(bytes: &[u8]) -> Result<FeedSnapshot, FeedError> {
    let message = FeedMessage::decode(bytes)?;
    if message.header.gtfs_realtime_version.is_empty() {
        return Err(FeedError::MissingHeader);
    }
    Ok(convert_message(message))
}

/// Convert an already-decoded feed message.
pub fn convert_message(message: FeedMessage) -> FeedSnapshot {
    let entities = message
        .entity
        .into_iter()
        .filter_map(convert_entity)
        .collect();

    FeedSnapshot::new(message.header.timestamp, entities)
}

fn convert_entity(entity: FeedEntity) -> Option<TripUpdateEntity> {
    let update = entity.trip_update?;

    Some(TripUpdateEntity {
        entity_id: entity.id,
        trip_id: update.trip.trip_id.unwrap_or_default(),
        route_id: update.trip.route_id,
        stop_events: update
            .stop_time_update
            .into_iter()
            .map(convert_stop_time_update)
            .collect(),
    })
}

fn convert_stop_time_update(stu: trip_update::StopTimeUpdate) -> StopEventRecord {
    StopEventRecord {
        stop_id: stu.stop_id.unwrap_or_default(),
        stop_sequence: stu.stop_sequence,
        arrival: stu.arrival.map(convert_event),
        departure: stu.departure.map(convert_event),
    }
}

fn convert_event(event: trip_update::StopTimeEvent) -> StopEvent {
    StopEvent {
        time: event.time,
        delay: event.delay,
    }
}

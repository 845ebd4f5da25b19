//! Nearest-arrival resolution.
//!
//! Both passes scan the snapshot in feed order and keep the first strict
//! minimum, so ties between trips go to whichever the feed listed first.
//! Feeds are not time-sorted; that order carries no meaning beyond being
//! stable for a given set of bytes.

use tracing::debug;

use crate::domain::{EventKind, FeedSnapshot, StopEventRecord, StopId, TripUpdateEntity};

use super::error::ResolveError;
use super::query::{ArrivalQuery, ArrivalResult};

/// One visit of a trip to a stop.
#[derive(Debug, Clone, Copy)]
pub struct StopVisit<'a> {
    pub entity: &'a TripUpdateEntity,
    pub record: &'a StopEventRecord,
}

/// A visit with a usable future time.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    visit: StopVisit<'a>,
    kind: EventKind,
    time: i64,
    minutes: u32,
}

/// Resolve the nearest upcoming event for `query`.
///
/// With a line prefix, only trips whose id starts with it are searched
/// first. If none of them has an eligible event at the stop, every trip is
/// searched and the result reports the line that actually serves the stop.
///
/// # Errors
///
/// Returns [`ResolveError::NotFound`] if no trip has an eligible event at
/// the stop.
pub fn resolve(
    snapshot: &FeedSnapshot,
    query: &ArrivalQuery,
) -> Result<ArrivalResult, ResolveError> {
    if let Some(prefix) = query.line_prefix() {
        if let Some(found) = nearest(snapshot.entities_with_prefix(prefix), query) {
            return Ok(into_result(found, query, false));
        }

        debug!(
            stop = %query.stop,
            prefix,
            "Nothing on requested line, searching all lines"
        );
    }

    if let Some(found) = nearest(snapshot.entities.iter(), query) {
        return Ok(into_result(found, query, query.line_prefix().is_some()));
    }

    Err(ResolveError::NotFound {
        stop: query.stop.clone(),
        line_prefix: query.line_prefix().map(str::to_string),
    })
}

/// Every record at `stop`, across all trips, in feed order.
pub fn stop_visits<'a>(snapshot: &'a FeedSnapshot, stop: &StopId) -> Vec<StopVisit<'a>> {
    let mut visits = Vec::new();
    for entity in &snapshot.entities {
        for record in &entity.stop_events {
            if stop.matches(&record.stop_id) {
                visits.push(StopVisit { entity, record });
            }
        }
    }
    visits
}

/// Rounded whole minutes from `now` until `event_time`.
///
/// Rounds half-to-even on exact half minutes. Returns `None` when the
/// rounded value is negative, so an event up to 30 seconds in the past still
/// counts as "0 minutes".
pub fn minutes_until(event_time: i64, now: i64) -> Option<u32> {
    let secs = event_time.saturating_sub(now);
    let whole = secs.div_euclid(60);
    let rem = secs.rem_euclid(60);

    let rounded = match rem.cmp(&30) {
        std::cmp::Ordering::Less => whole,
        std::cmp::Ordering::Greater => whole + 1,
        std::cmp::Ordering::Equal if whole % 2 == 0 => whole,
        std::cmp::Ordering::Equal => whole + 1,
    };

    if rounded < 0 {
        return None;
    }
    Some(u32::try_from(rounded).unwrap_or(u32::MAX))
}

fn nearest<'a>(
    entities: impl Iterator<Item = &'a TripUpdateEntity>,
    query: &ArrivalQuery,
) -> Option<Candidate<'a>> {
    let mut best: Option<Candidate<'a>> = None;

    for entity in entities {
        for record in &entity.stop_events {
            if !query.stop.matches(&record.stop_id) {
                continue;
            }

            let Some((kind, time)) = record.event_time() else {
                continue;
            };

            let Some(minutes) = minutes_until(time, query.now) else {
                continue;
            };

            if best.is_none_or(|b| minutes < b.minutes) {
                best = Some(Candidate {
                    visit: StopVisit { entity, record },
                    kind,
                    time,
                    minutes,
                });
            }
        }
    }

    best
}

fn into_result(found: Candidate<'_>, query: &ArrivalQuery, via_fallback: bool) -> ArrivalResult {
    let event = match found.kind {
        EventKind::Arrival => found.visit.record.arrival,
        EventKind::Departure => found.visit.record.departure,
    };

    ArrivalResult {
        minutes_until: found.minutes,
        line: found.visit.entity.line().to_string(),
        stop: query.stop.clone(),
        feed_stop_id: found.visit.record.stop_id.clone(),
        trip_id: found.visit.entity.trip_id.clone(),
        event: found.kind,
        event_time: found.time,
        delay: event.and_then(|e| e.delay),
        via_fallback,
    }
}

//! Static route schedules.
//!
//! Indexes `routes.txt`, `trips.txt` and `stop_times.txt` once at startup so
//! that a route lookup is a handful of map hits instead of a pass over every
//! file.

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use super::error::{ReferenceError, ScheduleError};
use super::names::StopNames;
use super::tables::{RouteRow, StopTimeRow, TripRow, read_table};

/// Name used for stops missing from `stops.txt`.
const UNKNOWN_STOP: &str = "Unknown Stop";

/// A trip of a route.
#[derive(Debug, Clone)]
struct Trip {
    trip_id: String,
    headsign: String,
}

/// One scheduled call, in `stop_times.txt` order.
#[derive(Debug, Clone)]
struct StopTime {
    stop_id: String,
    arrival_time: String,
    stop_sequence: u32,
}

/// Scheduled times at one stop of a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopSchedule {
    pub stop_id: String,
    pub stop_name: String,
    /// Distinct `HH:MM:SS` arrival times, sorted.
    pub times: Vec<String>,
}

/// Indexed static timetable.
#[derive(Debug, Clone, Default)]
pub struct StaticSchedule {
    /// Route short name → route id (first route with that name).
    routes: HashMap<String, String>,

    /// Route id → trips, in file order.
    trips_by_route: HashMap<String, Vec<Trip>>,

    /// All stop times, in file order.
    stop_times: Vec<StopTime>,

    /// Trip id → indices into `stop_times`.
    stop_times_by_trip: HashMap<String, Vec<usize>>,
}

impl StaticSchedule {
    /// Load and index the GTFS tables in `dir`.
    pub fn load(dir: &Path) -> Result<Self, ReferenceError> {
        let routes: Vec<RouteRow> = read_table(&dir.join("routes.txt"))?;
        let trips: Vec<TripRow> = read_table(&dir.join("trips.txt"))?;
        let stop_times: Vec<StopTimeRow> = read_table(&dir.join("stop_times.txt"))?;

        Ok(Self::from_rows(routes, trips, stop_times))
    }

    pub(crate) fn from_rows(
        routes: Vec<RouteRow>,
        trips: Vec<TripRow>,
        stop_time_rows: Vec<StopTimeRow>,
    ) -> Self {
        let mut route_ids = HashMap::new();
        for route in routes {
            route_ids
                .entry(route.route_short_name)
                .or_insert(route.route_id);
        }

        let mut trips_by_route: HashMap<String, Vec<Trip>> = HashMap::new();
        for trip in trips {
            trips_by_route.entry(trip.route_id).or_default().push(Trip {
                trip_id: trip.trip_id,
                headsign: trip.trip_headsign,
            });
        }

        let mut stop_times = Vec::with_capacity(stop_time_rows.len());
        let mut stop_times_by_trip: HashMap<String, Vec<usize>> = HashMap::new();
        let mut bad_sequence = 0usize;
        for row in stop_time_rows {
            let Ok(stop_sequence) = row.stop_sequence.parse::<u32>() else {
                bad_sequence += 1;
                continue;
            };
            stop_times_by_trip
                .entry(row.trip_id)
                .or_default()
                .push(stop_times.len());
            stop_times.push(StopTime {
                stop_id: row.stop_id,
                arrival_time: row.arrival_time,
                stop_sequence,
            });
        }

        if bad_sequence > 0 {
            warn!(
                skipped = bad_sequence,
                "Skipped stop_times rows with invalid stop_sequence"
            );
        }

        Self {
            routes: route_ids,
            trips_by_route,
            stop_times,
            stop_times_by_trip,
        }
    }

    /// Number of indexed routes.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Scheduled stops and times for a route.
    ///
    /// `direction` is matched case-insensitively as a substring of the trip
    /// headsign; `None` or an empty string selects every trip. Stops are
    /// grouped by display name and ordered by the first stop sequence seen
    /// for them.
    pub fn route_info(
        &self,
        route_short_name: &str,
        direction: Option<&str>,
        names: &StopNames,
    ) -> Result<Vec<StopSchedule>, ScheduleError> {
        let route_id = self
            .routes
            .get(route_short_name)
            .ok_or_else(|| ScheduleError::RouteNotFound(route_short_name.to_string()))?;

        let direction = direction.filter(|d| !d.is_empty());
        let needle = direction.map(str::to_lowercase);

        let trips: Vec<&Trip> = self
            .trips_by_route
            .get(route_id)
            .into_iter()
            .flatten()
            .filter(|t| {
                needle
                    .as_deref()
                    .is_none_or(|n| t.headsign.to_lowercase().contains(n))
            })
            .collect();

        if trips.is_empty() {
            return Err(ScheduleError::NoTrips {
                route: route_short_name.to_string(),
                direction: direction.unwrap_or_default().to_string(),
            });
        }

        // Walk the selected rows in file order.
        let mut rows: Vec<usize> = trips
            .iter()
            .filter_map(|t| self.stop_times_by_trip.get(&t.trip_id))
            .flatten()
            .copied()
            .collect();
        rows.sort_unstable();
        rows.dedup();

        let mut schedule: Vec<StopSchedule> = Vec::new();
        let mut by_name: HashMap<String, usize> = HashMap::new();
        let mut first_sequence: HashMap<&str, u32> = HashMap::new();

        for &idx in &rows {
            let stop_time = &self.stop_times[idx];
            let stop_name = names.get(&stop_time.stop_id).unwrap_or(UNKNOWN_STOP);

            let slot = *by_name.entry(stop_name.to_string()).or_insert_with(|| {
                schedule.push(StopSchedule {
                    stop_id: stop_time.stop_id.clone(),
                    stop_name: stop_name.to_string(),
                    times: Vec::new(),
                });
                schedule.len() - 1
            });
            schedule[slot].times.push(stop_time.arrival_time.clone());

            first_sequence
                .entry(stop_time.stop_id.as_str())
                .or_insert(stop_time.stop_sequence);
        }

        for stop in &mut schedule {
            stop.times.sort();
            stop.times.dedup();
        }

        schedule.sort_by_key(|s| {
            first_sequence
                .get(s.stop_id.as_str())
                .copied()
                .unwrap_or(u32::MAX)
        });

        Ok(schedule)
    }
}

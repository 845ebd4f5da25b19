//! Row types and CSV reading for static GTFS files.

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::ReferenceError;

/// A row of `routes.txt`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RouteRow {
    pub route_id: String,
    #[serde(default)]
    pub route_short_name: String,
}

/// A row of `trips.txt`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TripRow {
    pub route_id: String,
    pub trip_id: String,
    #[serde(default)]
    pub trip_headsign: String,
}

/// A row of `stop_times.txt`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StopTimeRow {
    pub trip_id: String,
    #[serde(default)]
    pub arrival_time: String,
    pub stop_id: String,
    pub stop_sequence: String,
}

/// A row of `stops.txt`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StopRow {
    pub stop_id: String,
    #[serde(default)]
    pub stop_name: String,
}

/// Read every well-formed row of a GTFS table.
///
/// Rows that fail to deserialize are skipped; a missing or unreadable file
/// is an error.
pub(crate) fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ReferenceError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| ReferenceError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for result in reader.deserialize() {
        match result {
            Ok(row) => rows.push(row),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(path = %path.display(), skipped, "Skipped malformed rows");
    }

    Ok(rows)
}

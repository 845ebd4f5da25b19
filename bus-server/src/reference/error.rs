//! Reference data error types.

use std::path::PathBuf;

/// Errors that can occur when loading the static GTFS tables.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    /// File missing, unreadable, or not CSV
    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Errors from static route lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// No route has this short name
    #[error("Route {0} not found")]
    RouteNotFound(String),

    /// The route exists but no trip matches the direction
    #[error("No trips found for route {route} with direction {direction}")]
    NoTrips { route: String, direction: String },
}

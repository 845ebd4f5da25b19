//! Startup loading of reference data.

use std::path::Path;

use tracing::{info, warn};

use super::names::StopNames;
use super::schedule::StaticSchedule;

/// All static reference data, loaded once.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub names: StopNames,
    pub schedule: StaticSchedule,
}

impl ReferenceData {
    /// Load every table from a GTFS static directory.
    ///
    /// Never fails: a table that cannot be read is logged and replaced by an
    /// empty one, so the server still answers real-time queries with raw
    /// stop identifiers.
    pub fn load_or_empty(dir: &Path) -> Self {
        let names = StopNames::load(&dir.join("stops.txt")).unwrap_or_else(|e| {
            warn!(error = %e, "Stop names unavailable, falling back to raw stop ids");
            StopNames::default()
        });

        let schedule = StaticSchedule::load(dir).unwrap_or_else(|e| {
            warn!(error = %e, "Static schedule unavailable, route info disabled");
            StaticSchedule::default()
        });

        info!(
            dir = %dir.display(),
            stops = names.len(),
            routes = schedule.route_count(),
            "Loaded reference data"
        );

        Self { names, schedule }
    }
}

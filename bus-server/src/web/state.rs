//! Application state for the web layer.

use std::sync::Arc;

use crate::feed::FeedSource;
use crate::reference::ReferenceData;

/// Fallback values for omitted query parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryDefaults {
    /// Stop used when `/bus_time` is called without `stop`
    pub stop: Option<String>,

    /// Line prefix used when `/bus_time` is called without `line_prefix`
    pub line_prefix: Option<String>,
}

/// Shared application state.
///
/// Everything here is read-only; each request fetches its own feed
/// snapshot through `feed`.
#[derive(Clone)]
pub struct AppState {
    /// Real-time feed source
    pub feed: Arc<dyn FeedSource>,

    /// Stop names and static schedules
    pub reference: Arc<ReferenceData>,

    /// Request parameter defaults
    pub defaults: Arc<QueryDefaults>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        feed: impl FeedSource + 'static,
        reference: ReferenceData,
        defaults: QueryDefaults,
    ) -> Self {
        Self {
            feed: Arc::new(feed),
            reference: Arc::new(reference),
            defaults: Arc::new(defaults),
        }
    }
}

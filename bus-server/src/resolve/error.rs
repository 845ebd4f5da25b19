//! Resolution error types.

use crate::domain::StopId;

/// Errors from resolving a query against a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No upcoming event at the stop, even after widening to every line
    #[error("no upcoming arrival at stop {stop}{}", prefix_suffix(.line_prefix))]
    NotFound {
        stop: StopId,
        line_prefix: Option<String>,
    },
}

fn prefix_suffix(line_prefix: &Option<String>) -> String {
    match line_prefix {
        Some(prefix) => format!(" (line prefix {prefix})"),
        None => String::new(),
    }
}

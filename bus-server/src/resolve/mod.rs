//! Feed resolution engine.
//!
//! Answers "when is the next bus at this stop?" against one decoded
//! snapshot. The search is two-tier: first only trips on the requested line,
//! then, if that finds nothing, every trip in the feed. Callers often know
//! their stop but not which line currently serves it.

mod engine;
mod error;
mod query;

pub use engine::{StopVisit, minutes_until, resolve, stop_visits};
pub use error::ResolveError;
pub use query::{ArrivalQuery, ArrivalResult};

//! Static GTFS reference data.
//!
//! Provides stop id → name enrichment for real-time answers and the static
//! per-route timetable. Everything is read from the GTFS static directory
//! once at startup and is immutable afterwards.

mod data;
mod error;
mod names;
mod schedule;
mod tables;

pub use data::ReferenceData;
pub use error::{ReferenceError, ScheduleError};
pub use names::StopNames;
pub use schedule::{StaticSchedule, StopSchedule};

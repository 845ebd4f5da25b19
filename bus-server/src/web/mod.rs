//! Web layer for the bus arrival server.
//!
//! Provides the JSON endpoints for next-arrival queries, feed debugging and
//! static route info.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, QueryDefaults};

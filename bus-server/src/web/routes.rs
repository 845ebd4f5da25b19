//! HTTP route handlers.

use std::any::Any;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::Utc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::StopId;
use crate::feed::{FeedError, load_snapshot};
use crate::reference::{ScheduleError, StopSchedule};
use crate::resolve::{ArrivalQuery, ResolveError, resolve, stop_visits};

use super::dto::*;
use super::state::{AppState, QueryDefaults};

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/bus_time", get(bus_time))
        .route("/debug", get(feed_summary))
        .route("/debug/all_stops", get(all_stops))
        .route("/debug/line/:prefix", get(debug_line))
        .route("/debug_stop/:stop_id", get(debug_stop))
        .route("/route_info/:route_name/:direction", get(route_info))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

/// Banner.
async fn index() -> &'static str {
    "Bus Time API is running. Visit /bus_time to get data."
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Next arrival at a stop, optionally on a given line.
async fn bus_time(
    State(state): State<AppState>,
    Query(req): Query<BusTimeRequest>,
) -> Result<Json<BusTimeResponse>, AppError> {
    let query = build_query(req, &state.defaults, Utc::now().timestamp())?;

    let snapshot = load_snapshot(state.feed.as_ref()).await?;
    let result = resolve(&snapshot, &query)?;

    Ok(Json(BusTimeResponse::from_result(
        result,
        &state.reference.names,
    )))
}

/// Turn query parameters into an [`ArrivalQuery`], applying defaults.
fn build_query(
    req: BusTimeRequest,
    defaults: &QueryDefaults,
    now: i64,
) -> Result<ArrivalQuery, AppError> {
    let raw_stop = req
        .stop
        .filter(|s| !s.trim().is_empty())
        .or_else(|| defaults.stop.clone())
        .ok_or_else(|| AppError::BadRequest {
            message: "Missing required query parameter: stop".to_string(),
        })?;

    let stop = StopId::parse(&raw_stop).map_err(|e| AppError::BadRequest {
        message: format!("Invalid stop {raw_stop:?}: {e}"),
    })?;

    let query = ArrivalQuery::new(stop, now);
    Ok(match req.line_prefix.or_else(|| defaults.line_prefix.clone()) {
        Some(prefix) => query.with_line_prefix(prefix),
        None => query,
    })
}

/// Summary of the current feed.
async fn feed_summary(State(state): State<AppState>) -> Result<Json<FeedSummaryResponse>, AppError> {
    let snapshot = load_snapshot(state.feed.as_ref()).await?;
    Ok(Json(FeedSummaryResponse::from_snapshot(&snapshot)))
}

/// Sorted distinct stop identifiers in the current feed.
async fn all_stops(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    let snapshot = load_snapshot(state.feed.as_ref()).await?;
    Ok(Json(
        snapshot.stop_ids().into_iter().map(str::to_string).collect(),
    ))
}

/// Raw trips whose id starts with a prefix.
async fn debug_line(
    State(state): State<AppState>,
    Path(prefix): Path<String>,
) -> Result<Json<LineDumpResponse>, AppError> {
    let snapshot = load_snapshot(state.feed.as_ref()).await?;

    let trips: Vec<TripDump> = snapshot
        .entities_with_prefix(&prefix)
        .map(TripDump::from_entity)
        .collect();

    if trips.is_empty() {
        return Err(AppError::NotFound {
            message: format!("No trips found with prefix {prefix}"),
            stop: None,
            line: Some(prefix),
        });
    }

    Ok(Json(LineDumpResponse { prefix, trips }))
}

/// Raw predictions at a stop across all trips.
async fn debug_stop(
    State(state): State<AppState>,
    Path(stop_id): Path<String>,
) -> Result<Json<StopDumpResponse>, AppError> {
    let stop = StopId::parse(&stop_id).map_err(|e| AppError::BadRequest {
        message: format!("Invalid stop {stop_id:?}: {e}"),
    })?;

    let snapshot = load_snapshot(state.feed.as_ref()).await?;
    let now = Utc::now().timestamp();

    let visits: Vec<StopVisitDump> = stop_visits(&snapshot, &stop)
        .iter()
        .map(|v| StopVisitDump::from_visit(v, now))
        .collect();

    if visits.is_empty() {
        return Err(AppError::NotFound {
            message: format!("Stop {stop} not found in feed"),
            stop: Some(stop.to_string()),
            line: None,
        });
    }

    Ok(Json(StopDumpResponse {
        stop_name: state.reference.names.lookup(&stop_id).to_string(),
        stop: stop.to_string(),
        visits,
    }))
}

/// Static schedule of a route in one direction.
async fn route_info(
    State(state): State<AppState>,
    Path((route_name, direction)): Path<(String, String)>,
) -> Result<Json<Vec<StopSchedule>>, AppError> {
    let schedule = state.reference.schedule.route_info(
        &route_name,
        Some(&direction),
        &state.reference.names,
    )?;

    Ok(Json(schedule))
}

/// Convert a handler panic into a generic 500.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::Internal { message: detail }.into_response()
}

/// Message returned for every internal error.
const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest {
        message: String,
    },
    NotFound {
        message: String,
        stop: Option<String>,
        line: Option<String>,
    },
    /// The feed could not be fetched or decoded.
    Upstream {
        message: String,
    },
    /// Anything else. The message is logged, never sent.
    Internal {
        message: String,
    },
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        let message = if e.is_decode() {
            format!("Failed to decode GTFS data: {e}")
        } else {
            format!("Failed to fetch GTFS data: {e}")
        };
        AppError::Upstream { message }
    }
}

impl From<ResolveError> for AppError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NotFound { stop, line_prefix } => AppError::NotFound {
                message: "Could not find arrival time for the specified route and stop."
                    .to_string(),
                stop: Some(stop.to_string()),
                line: line_prefix,
            },
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(e: ScheduleError) -> Self {
        AppError::NotFound {
            message: e.to_string(),
            stop: None,
            line: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest { message } => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: message,
                    stop: None,
                    line: None,
                },
            ),
            AppError::NotFound {
                message,
                stop,
                line,
            } => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: message,
                    stop,
                    line,
                },
            ),
            AppError::Upstream { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: message,
                    stop: None,
                    line: None,
                },
            ),
            AppError::Internal { message } => {
                error!(detail = %message, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: INTERNAL_ERROR_MESSAGE.to_string(),
                        stop: None,
                        line: None,
                    },
                )
            }
        };

        if status.is_server_error() {
            error!(%status, error = %body.error, "Request failed");
        } else {
            warn!(%status, error = %body.error, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

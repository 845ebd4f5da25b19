//! End-to-end tests of the HTTP API against an in-memory feed.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use prost::Message;
use serde_json::{Value, json};
use tower::ServiceExt;

use bus_server::feed::StaticFeed;
use bus_server::gtfs_rt::{FeedEntity, FeedHeader, FeedMessage, TripDescriptor, TripUpdate, trip_update};
use bus_server::reference::{ReferenceData, StopNames};
use bus_server::web::{AppState, QueryDefaults, create_router};

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn stop_time(stop: &str, arrival: Option<i64>, departure: Option<i64>) -> trip_update::StopTimeUpdate {
    let event = |t: i64| trip_update::StopTimeEvent {
        time: Some(t),
        ..Default::default()
    };
    trip_update::StopTimeUpdate {
        stop_id: Some(stop.to_string()),
        arrival: arrival.map(event),
        departure: departure.map(event),
        ..Default::default()
    }
}

fn trip(trip_id: &str, stops: Vec<trip_update::StopTimeUpdate>) -> FeedEntity {
    FeedEntity {
        id: format!("entity-{trip_id}"),
        trip_update: Some(TripUpdate {
            trip: TripDescriptor {
                trip_id: Some(trip_id.to_string()),
                ..Default::default()
            },
            stop_time_update: stops,
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn feed_bytes(entities: Vec<FeedEntity>) -> Vec<u8> {
    FeedMessage {
        header: FeedHeader {
            gtfs_realtime_version: "2.0".to_string(),
            timestamp: Some(now() as u64),
            ..Default::default()
        },
        entity: entities,
    }
    .encode_to_vec()
}

fn sample_feed() -> Vec<u8> {
    let now = now();
    feed_bytes(vec![
        trip(
            "211.1",
            vec![
                stop_time("000108", Some(now + 300), Some(now + 320)),
                stop_time("000109", None, Some(now + 600)),
            ],
        ),
        trip("95.4", vec![stop_time("000200", Some(now - 600), None)]),
        FeedEntity {
            id: "vehicle-1".to_string(),
            ..Default::default()
        },
    ])
}

fn app_with(feed: StaticFeed, defaults: QueryDefaults) -> Router {
    let reference = ReferenceData {
        names: StopNames::from_pairs([("000108", "Pl. Catalunya")]),
        ..Default::default()
    };
    create_router(AppState::new(feed, reference, defaults))
}

fn app() -> Router {
    app_with(StaticFeed::from_bytes(sample_feed()), QueryDefaults::default())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn bus_time_on_requested_line() {
    let (status, body) = get(app(), "/bus_time?stop=108&line_prefix=211.").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["line"], "211");
    assert_eq!(body["stop"], "108");
    assert_eq!(body["stop_name"], "Pl. Catalunya");
    assert_eq!(body["arrival_min"], 5);
    assert_eq!(body["trip_id_found"], "211.1");
    assert_eq!(body["event"], "arrival");
    assert_eq!(body["fallback"], false);
}

#[tokio::test]
async fn bus_time_falls_back_to_other_line() {
    let (status, body) = get(app(), "/bus_time?stop=000108&line_prefix=999.").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["line"], "211");
    assert_eq!(body["stop"], "108");
    assert_eq!(body["arrival_min"], 5);
    assert_eq!(body["fallback"], true);
}

#[tokio::test]
async fn bus_time_uses_departure_without_arrival() {
    let (status, body) = get(app(), "/bus_time?stop=109").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["arrival_min"], 10);
    assert_eq!(body["event"], "departure");
    // Unknown stop names fall back to the feed's identifier
    assert_eq!(body["stop_name"], "000109");
}

#[tokio::test]
async fn bus_time_past_only_is_not_found() {
    let (status, body) = get(app(), "/bus_time?stop=200&line_prefix=95.").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "error": "Could not find arrival time for the specified route and stop.",
            "stop": "200",
            "line": "95.",
        })
    );
}

#[tokio::test]
async fn bus_time_requires_a_stop() {
    let (status, body) = get(app(), "/bus_time").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required query parameter: stop");
}

#[tokio::test]
async fn bus_time_default_stop() {
    let defaults = QueryDefaults {
        stop: Some("000108".to_string()),
        line_prefix: Some("211.".to_string()),
    };
    let app = app_with(StaticFeed::from_bytes(sample_feed()), defaults);
    let (status, body) = get(app, "/bus_time").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["line"], "211");
    assert_eq!(body["fallback"], false);
}

#[tokio::test]
async fn malformed_feed_is_a_decode_error() {
    let app = app_with(
        StaticFeed::from_bytes(vec![0xFF, 0xFE, 0x00, 0x01]),
        QueryDefaults::default(),
    );
    let (status, body) = get(app, "/bus_time?stop=108").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to decode GTFS data"), "{error}");
}

#[tokio::test]
async fn empty_feed_body_is_a_decode_error() {
    let app = app_with(StaticFeed::from_bytes(Vec::new()), QueryDefaults::default());
    let (status, body) = get(app, "/bus_time?stop=108").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to decode GTFS data"), "{error}");
}

#[tokio::test]
async fn unreadable_feed_is_a_fetch_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with(
        StaticFeed::from_file(dir.path().join("missing.bin")),
        QueryDefaults::default(),
    );
    let (status, body) = get(app, "/bus_time?stop=108").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to fetch GTFS data"), "{error}");
}

#[tokio::test]
async fn all_stops_sorted_distinct() {
    let (status, body) = get(app(), "/debug/all_stops").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["000108", "000109", "000200"]));
}

#[tokio::test]
async fn feed_summary() {
    let (status, body) = get(app(), "/debug").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["trip_updates_found"], 2);
    assert_eq!(body["trip_descriptor_samples"][0]["trip_id"], "211.1");
    assert_eq!(body["available_stops"], json!(["000108", "000109", "000200"]));
}

#[tokio::test]
async fn debug_line_dump() {
    let (status, body) = get(app(), "/debug/line/211.").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prefix"], "211.");
    assert_eq!(body["trips"].as_array().unwrap().len(), 1);
    assert_eq!(body["trips"][0]["line"], "211");
    assert_eq!(body["trips"][0]["stop_events"][0]["stop_id"], "000108");

    let (status, body) = get(app(), "/debug/line/999.").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["line"], "999.");
}

#[tokio::test]
async fn debug_stop_dump() {
    let (status, body) = get(app(), "/debug_stop/108").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stop"], "108");
    assert_eq!(body["stop_name"], "Pl. Catalunya");
    assert_eq!(body["visits"][0]["trip_id"], "211.1");
    assert_eq!(body["visits"][0]["minutes_until"], 5);

    let (status, _) = get(app(), "/debug_stop/4242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn route_info_without_static_data_is_not_found() {
    let (status, body) = get(app(), "/route_info/L95/Castelldefels").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Route L95 not found");
}

#[tokio::test]
async fn route_info_from_static_tables() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("stops.txt"),
        "stop_id,stop_name\n000108,Pl. Catalunya\n000109,Diagonal\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("routes.txt"), "route_id,route_short_name\nR95,L95\n").unwrap();
    std::fs::write(
        dir.path().join("trips.txt"),
        "route_id,trip_id,trip_headsign\nR95,T1,Castelldefels\nR95,T2,Barcelona\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join("stop_times.txt"),
        "trip_id,arrival_time,stop_id,stop_sequence\n\
         T1,08:10:00,000109,2\n\
         T1,08:00:00,000108,1\n\
         T2,09:00:00,000109,1\n",
    )
    .unwrap();

    let reference = ReferenceData::load_or_empty(dir.path());
    let app = create_router(AppState::new(
        StaticFeed::from_bytes(Vec::new()),
        reference,
        QueryDefaults::default(),
    ));

    let (status, body) = get(app, "/route_info/L95/castelldefels").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "stop_id": "000108", "stop_name": "Pl. Catalunya", "times": ["08:00:00"] },
            { "stop_id": "000109", "stop_name": "Diagonal", "times": ["08:10:00"] },
        ])
    );
}

#[tokio::test]
async fn health_and_index() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/bus_time"));
}

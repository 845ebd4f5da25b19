use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use bus_server::config::AppConfig;
use bus_server::feed::{FeedClient, FeedSource, StaticFeed};
use bus_server::reference::ReferenceData;
use bus_server::web::{AppState, QueryDefaults, create_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bus_server=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env()?;

    // Load static reference data (degrades to empty tables on failure)
    let reference = ReferenceData::load_or_empty(&config.gtfs_static_dir);

    let defaults = QueryDefaults {
        stop: config.default_stop.clone(),
        line_prefix: config.default_line_prefix.clone(),
    };

    // Build app state around either a local file or the live feed
    let state = match &config.feed_file {
        Some(path) => {
            warn!(path = %path.display(), "Serving feed from local file");
            build_state(StaticFeed::from_file(path), reference, defaults)
        }
        None => build_state(FeedClient::new(config.feed_config())?, reference, defaults),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Bus Time API listening on http://{addr}");
    info!("  GET  /bus_time?stop=<id>&line_prefix=<prefix>");
    info!("  GET  /debug, /debug/all_stops, /debug/line/<prefix>, /debug_stop/<id>");
    info!("  GET  /route_info/<route_name>/<direction>");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_state(
    feed: impl FeedSource + 'static,
    reference: ReferenceData,
    defaults: QueryDefaults,
) -> AppState {
    info!(source = %feed.describe(), "Using real-time feed");
    AppState::new(feed, reference, defaults)
}

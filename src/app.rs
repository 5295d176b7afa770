//! Application state and HTTP router construction.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::jobs::SpamScanner;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub scanner: Arc<SpamScanner>,
}

/// Build the full Axum router: health endpoints, /api, and layers.
pub fn build_app(state: AppState) -> Router<()> {
    Router::new()
        .merge(api::health::router())
        .nest("/api", api::scan::router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub fn test_state(api: crate::services::youtube::fake::FakeYoutube) -> AppState {
    use crate::jobs::JobStatusStore;
    use crate::services::BlocklistMatcher;

    let config = Config {
        host: None,
        port: 0,
        channel_id: "UC1".to_string(),
        blocklist_path: "unused.json".to_string(),
        youtube_api_base_url: "http://localhost".to_string(),
        youtube_requests_per_second: 5,
        youtube_burst_size: 5,
    };
    let scanner = SpamScanner::new(
        Arc::new(api),
        Arc::new(BlocklistMatcher::new(["cheap followers"])),
        Arc::new(JobStatusStore::new()),
        config.channel_id.clone(),
    );
    AppState {
        config: Arc::new(config),
        scanner: Arc::new(scanner),
    }
}

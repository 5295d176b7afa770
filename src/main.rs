//! Spamsweep - removes blocklisted spam comments from a YouTube channel
//!
//! A scan is started with `POST /api/youtube/scan` and runs in the background;
//! callers poll `GET /api/youtube/scan` for progress.

mod api;
mod app;
mod config;
mod jobs;
mod services;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{AppState, build_app};
use crate::config::Config;
use crate::jobs::{JobStatusStore, SpamScanner};
use crate::services::rate_limiter::RateLimitConfig;
use crate::services::{BlocklistMatcher, YoutubeClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spamsweep=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    tracing::info!("Starting Spamsweep");

    let config = Arc::new(Config::from_env()?);
    tracing::info!(channel_id = %config.channel_id, "Configuration loaded");

    let matcher = Arc::new(BlocklistMatcher::load(&config.blocklist_path));

    let youtube = YoutubeClient::new(
        config.youtube_api_base_url.clone(),
        RateLimitConfig {
            requests_per_second: config.youtube_requests_per_second,
            burst_size: config.youtube_burst_size,
        },
    )?;
    tracing::info!(base_url = %config.youtube_api_base_url, "YouTube client initialized");

    let scanner = Arc::new(SpamScanner::new(
        Arc::new(youtube),
        matcher,
        Arc::new(JobStatusStore::new()),
        config.channel_id.clone(),
    ));

    let state = AppState {
        config: config.clone(),
        scanner,
    };
    let app = build_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        host = config.host.as_deref().unwrap_or("localhost"),
        "Listening on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! Application configuration management

use std::env;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (informational, used in the startup log line)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// Channel whose uploads are scanned
    pub channel_id: String,

    /// Path to the JSON array of blocked terms
    pub blocklist_path: String,

    /// Base URL of the YouTube Data API v3
    pub youtube_api_base_url: String,

    /// Outbound YouTube requests per second
    pub youtube_requests_per_second: u32,

    /// Burst capacity for outbound YouTube requests
    pub youtube_burst_size: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let channel_id = lookup("YOUTUBE_CHANNEL_ID")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .context("YOUTUBE_CHANNEL_ID environment variable is not set")?;

        Ok(Self {
            host: lookup("HOST"),

            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .context("Invalid PORT")?,

            channel_id,

            blocklist_path: lookup("BLOCKLIST_PATH")
                .unwrap_or_else(|| "blockedword.json".to_string()),

            youtube_api_base_url: lookup("YOUTUBE_API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://www.googleapis.com/youtube/v3".to_string()),

            youtube_requests_per_second: lookup("YOUTUBE_REQUESTS_PER_SECOND")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .context("Invalid YOUTUBE_REQUESTS_PER_SECOND")?,

            youtube_burst_size: lookup("YOUTUBE_BURST_SIZE")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .context("Invalid YOUTUBE_BURST_SIZE")?,
        })
    }
}

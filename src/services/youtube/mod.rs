//! YouTube Data API v3 integration
//!
//! [YoutubeApi] is the seam between the scan pipeline and the platform: the
//! production implementation is [YoutubeClient], tests drive the pipeline
//! through an in-memory fake.

mod client;
#[cfg(test)]
pub mod fake;
pub mod types;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

pub use client::YoutubeClient;
pub use types::{CommentThread, Page, PlaylistItem};

/// Maximum page size for `playlistItems.list`
pub const PLAYLIST_PAGE_SIZE: u32 = 50;

/// Maximum page size for `commentThreads.list`
pub const COMMENT_THREAD_PAGE_SIZE: u32 = 100;

/// Error reason YouTube reports when a video has comments turned off
const COMMENTS_DISABLED_REASON: &str = "commentsDisabled";

/// Opaque OAuth bearer credential supplied by the identity layer.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn bearer(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Errors returned by the YouTube API
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// The credential was rejected (HTTP 401)
    #[error("credential rejected by YouTube: {0}")]
    Unauthorized(String),

    /// YouTube answered with an error payload
    #[error("{message}")]
    Api {
        status: u16,
        reason: Option<String>,
        message: String,
    },

    /// Transport or decoding failure
    #[error("YouTube request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl YoutubeError {
    /// First error reason from the API payload, if any
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Api { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    pub fn is_comments_disabled(&self) -> bool {
        self.reason() == Some(COMMENTS_DISABLED_REASON)
    }
}

/// Content-platform operations consumed by the scan pipeline
#[async_trait]
pub trait YoutubeApi: Send + Sync {
    /// Resolve the channel's uploads playlist. `Ok(None)` if the channel or
    /// its uploads playlist does not exist.
    async fn channel_uploads(
        &self,
        credential: &Credential,
        channel_id: &str,
    ) -> Result<Option<String>, YoutubeError>;

    async fn playlist_items(
        &self,
        credential: &Credential,
        playlist_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<PlaylistItem>, YoutubeError>;

    async fn comment_threads(
        &self,
        credential: &Credential,
        video_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<CommentThread>, YoutubeError>;

    async fn delete_comment(
        &self,
        credential: &Credential,
        comment_id: &str,
    ) -> Result<(), YoutubeError>;
}

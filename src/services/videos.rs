//! Channel upload enumeration

use thiserror::Error;
use tracing::{info, warn};

use super::Progress;
use super::youtube::{Credential, PLAYLIST_PAGE_SIZE, PlaylistItem, YoutubeApi, YoutubeError};

/// A video from the channel's uploads playlist. `id` is absent for playlist
/// entries whose video has been deleted or made private.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    pub id: Option<String>,
    pub title: String,
}

impl From<&PlaylistItem> for VideoRef {
    fn from(item: &PlaylistItem) -> Self {
        Self {
            id: item.video_id().map(str::to_string),
            title: item.title().unwrap_or("Unknown Title").to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EnumerationError {
    #[error("Error fetching videos: {0}")]
    ChannelLookup(#[source] YoutubeError),

    #[error("Error fetching videos: Could not find uploads playlist ID for channel {0}")]
    UploadsNotFound(String),

    #[error("Error fetching videos: {0}")]
    PageFetch(#[source] YoutubeError),
}

/// List every video in the channel's uploads playlist, in playlist order.
///
/// Any page failure aborts the enumeration; partial results are discarded.
pub async fn list_channel_videos(
    api: &dyn YoutubeApi,
    credential: &Credential,
    channel_id: &str,
    on_progress: Progress<'_>,
) -> Result<Vec<VideoRef>, EnumerationError> {
    on_progress(format!("Fetching channel details for ID: {}...", channel_id));

    let uploads = api
        .channel_uploads(credential, channel_id)
        .await
        .map_err(EnumerationError::ChannelLookup)?
        .ok_or_else(|| EnumerationError::UploadsNotFound(channel_id.to_string()))?;

    on_progress(format!(
        "Found uploads playlist ID: {}. Fetching videos...",
        uploads
    ));

    let mut videos = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = api
            .playlist_items(credential, &uploads, PLAYLIST_PAGE_SIZE, page_token.as_deref())
            .await
            .map_err(|e| {
                warn!(channel_id = %channel_id, playlist_id = %uploads, error = %e, "Failed to fetch uploads page");
                EnumerationError::PageFetch(e)
            })?;

        videos.extend(page.items.iter().map(VideoRef::from));
        on_progress(format!("Fetched {} videos so far...", videos.len()));

        match page.next_cursor() {
            Some(next) => page_token = Some(next.to_string()),
            None => break,
        }
    }

    info!(channel_id = %channel_id, total = videos.len(), "Enumerated channel uploads");
    on_progress(format!("Finished fetching {} total videos.", videos.len()));
    Ok(videos)
}

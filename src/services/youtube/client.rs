//! reqwest implementation of [YoutubeApi]

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::types::{Channel, CommentThread, ErrorResponse, Page, PlaylistItem};
use super::{Credential, YoutubeApi, YoutubeError};
use crate::services::rate_limiter::{RateLimitConfig, RateLimitedClient};

/// YouTube Data API v3 client. Every call is paced through a shared limiter.
pub struct YoutubeClient {
    client: RateLimitedClient,
    base_url: String,
}

impl YoutubeClient {
    pub fn new(base_url: impl Into<String>, rate_limit: RateLimitConfig) -> Result<Self> {
        Ok(Self {
            client: RateLimitedClient::new("youtube", rate_limit)?,
            base_url: base_url.into(),
        })
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<Page<T>, YoutubeError> {
        let response = self
            .client
            .send_authorized(Method::GET, &self.url(resource), credential.bearer(), query)
            .await?;
        let response = check_status(response).await?;
        Ok(response.json::<Page<T>>().await?)
    }
}

/// Turn a non-success response into a [YoutubeError], decoding the Google
/// error envelope when present.
async fn check_status(response: Response) -> Result<Response, YoutubeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorResponse>(&body).ok();
    let message = parsed
        .as_ref()
        .and_then(|e| e.error.message.clone())
        .unwrap_or_else(|| format!("YouTube API returned {}", status));
    let reason = parsed
        .as_ref()
        .and_then(|e| e.error.errors.first())
        .and_then(|d| d.reason.clone());

    if status == StatusCode::UNAUTHORIZED {
        warn!(message = %message, "YouTube rejected the credential");
        return Err(YoutubeError::Unauthorized(message));
    }

    debug!(status = status.as_u16(), reason = ?reason, message = %message, "YouTube API error");
    Err(YoutubeError::Api {
        status: status.as_u16(),
        reason,
        message,
    })
}

#[async_trait]
impl YoutubeApi for YoutubeClient {
    async fn channel_uploads(
        &self,
        credential: &Credential,
        channel_id: &str,
    ) -> Result<Option<String>, YoutubeError> {
        let page: Page<Channel> = self
            .list(
                credential,
                "channels",
                &[("part", "contentDetails"), ("id", channel_id)],
            )
            .await?;

        Ok(page
            .items
            .first()
            .and_then(Channel::uploads_playlist)
            .map(str::to_string))
    }

    async fn playlist_items(
        &self,
        credential: &Credential,
        playlist_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<PlaylistItem>, YoutubeError> {
        let max_results = page_size.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        self.list(credential, "playlistItems", &query).await
    }

    async fn comment_threads(
        &self,
        credential: &Credential,
        video_id: &str,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<CommentThread>, YoutubeError> {
        let max_results = page_size.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("videoId", video_id),
            ("maxResults", max_results.as_str()),
            ("textFormat", "plainText"),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        self.list(credential, "commentThreads", &query).await
    }

    async fn delete_comment(
        &self,
        credential: &Credential,
        comment_id: &str,
    ) -> Result<(), YoutubeError> {
        let response = self
            .client
            .send_authorized(
                Method::DELETE,
                &self.url("comments"),
                credential.bearer(),
                &[("id", comment_id)],
            )
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

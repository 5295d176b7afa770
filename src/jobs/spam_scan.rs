//! Channel-wide spam scan
//!
//! Enumerates the channel's uploads, scans each video's comments, deletes the
//! flagged ones and publishes progress to the [JobStatusStore]. Only one scan
//! runs at a time; the scan runs as a detached task and reports solely through
//! the status store.

use std::any::Any;
use std::sync::Arc;

use thiserror::Error;
use tracing::{Instrument, debug, error, info, info_span};
use uuid::Uuid;

use super::status::JobStatusStore;
use crate::services::comments::scan_video;
use crate::services::deletion::delete_comments;
use crate::services::videos::{EnumerationError, list_channel_videos};
use crate::services::{BlocklistMatcher, Credential, YoutubeApi};

#[derive(Debug, Error)]
#[error("Scan is already in progress.")]
pub struct ScanAlreadyRunning;

/// Totals for a finished scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub videos: usize,
    pub spam_found: usize,
    pub spam_deleted: usize,
    pub delete_failures: usize,
}

impl ScanSummary {
    fn message(&self) -> String {
        format!(
            "Scan completed. Processed {} videos. Found {} spam comments, successfully deleted {}.",
            self.videos, self.spam_found, self.spam_deleted
        )
    }
}

/// Drives the scan pipeline and enforces single-flight execution
pub struct SpamScanner {
    api: Arc<dyn YoutubeApi>,
    matcher: Arc<BlocklistMatcher>,
    status: Arc<JobStatusStore>,
    channel_id: String,
}

impl SpamScanner {
    pub fn new(
        api: Arc<dyn YoutubeApi>,
        matcher: Arc<BlocklistMatcher>,
        status: Arc<JobStatusStore>,
        channel_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            matcher,
            status,
            channel_id: channel_id.into(),
        }
    }

    pub fn status(&self) -> &JobStatusStore {
        &self.status
    }

    pub fn matcher(&self) -> &BlocklistMatcher {
        &self.matcher
    }

    /// Start a scan in the background. Returns immediately with the new job
    /// id, or [ScanAlreadyRunning] if a scan is in flight.
    pub fn start(&self, credential: Credential) -> Result<Uuid, ScanAlreadyRunning> {
        let job_id = self.status.try_start().ok_or(ScanAlreadyRunning)?;
        info!(job_id = %job_id, channel_id = %self.channel_id, "Starting spam scan");

        let pipeline = Pipeline {
            api: self.api.clone(),
            matcher: self.matcher.clone(),
            status: self.status.clone(),
            channel_id: self.channel_id.clone(),
        };
        let status = self.status.clone();

        // The pipeline runs in its own task so a panic surfaces as a JoinError
        // here and the job is still finished.
        tokio::spawn(
            async move {
                match tokio::spawn(pipeline.run(credential).in_current_span()).await {
                    Ok(Ok(summary)) => status.complete(summary.message()),
                    Ok(Err(e)) => {
                        error!(error = %e, "Spam scan failed");
                        status.fail(e.to_string());
                    }
                    Err(join_error) => {
                        let reason = if join_error.is_panic() {
                            panic_message(join_error.into_panic())
                        } else {
                            "scan task was cancelled".to_string()
                        };
                        error!(error = %reason, "Spam scan task aborted");
                        status.fail(reason);
                    }
                }
            }
            .instrument(info_span!("spam_scan", job_id = %job_id)),
        );

        Ok(job_id)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("Unexpected error during scan: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("Unexpected error during scan: {}", s)
    } else {
        "An unknown error occurred during the scan.".to_string()
    }
}

/// Owned inputs for one run, moved into the background task
struct Pipeline {
    api: Arc<dyn YoutubeApi>,
    matcher: Arc<BlocklistMatcher>,
    status: Arc<JobStatusStore>,
    channel_id: String,
}

impl Pipeline {
    async fn run(self, credential: Credential) -> Result<ScanSummary, EnumerationError> {
        let status = &self.status;
        let on_progress = |message: String| {
            debug!(message = %message, "Scan progress");
            status.set_message(message);
        };

        let videos = list_channel_videos(
            self.api.as_ref(),
            &credential,
            &self.channel_id,
            &on_progress,
        )
        .await?;

        let total = videos.len();
        status.update(|p| p.total_videos = total);
        on_progress(format!(
            "Found {} videos. Starting comment analysis...",
            total
        ));

        let mut summary = ScanSummary {
            videos: total,
            ..Default::default()
        };

        for (index, video) in videos.iter().enumerate() {
            let position = index + 1;
            let label = format!(
                "{} ({})",
                video.title,
                video.id.as_deref().unwrap_or("unknown")
            );
            status.update(|p| {
                p.videos_processed = position;
                p.current_video = label;
            });

            let Some(video_id) = video.id.as_deref() else {
                on_progress(format!("Skipping item {} (no video ID found)", position));
                continue;
            };

            on_progress(format!(
                "[{}/{}] Analyzing comments for: {}",
                position, total, video.title
            ));
            let flagged = scan_video(
                self.api.as_ref(),
                &credential,
                video_id,
                &self.matcher,
                &on_progress,
            )
            .await;

            summary.spam_found += flagged.len();
            status.update(|p| p.spam_found += flagged.len());

            if flagged.is_empty() {
                on_progress(format!(
                    "[{}/{}] No spam found for: {}",
                    position, total, video.title
                ));
                continue;
            }

            on_progress(format!(
                "[{}/{}] Deleting {} spam comments for: {}",
                position,
                total,
                flagged.len(),
                video.title
            ));
            let outcome =
                delete_comments(self.api.as_ref(), &credential, &flagged, &on_progress).await;

            summary.spam_deleted += outcome.succeeded;
            summary.delete_failures += outcome.failed;
            status.update(|p| p.spam_deleted += outcome.succeeded);
        }

        info!(
            videos = summary.videos,
            spam_found = summary.spam_found,
            spam_deleted = summary.spam_deleted,
            delete_failures = summary.delete_failures,
            "Spam scan completed"
        );
        Ok(summary)
    }
}

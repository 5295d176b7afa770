//! Per-video comment scanning
//!
//! Walks every comment thread of a video and collects the ids of top-level
//! comments the blocklist flags. Replies are not inspected.

use tracing::{debug, info, warn};

use super::Progress;
use super::blocklist::BlocklistMatcher;
use super::youtube::{COMMENT_THREAD_PAGE_SIZE, Credential, YoutubeApi};

/// A top-level comment as seen by the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRef<'a> {
    pub id: &'a str,
    pub display_text: &'a str,
}

/// Scan one video and return the ids of flagged comments.
///
/// Never fails: a comments-disabled response ends the scan quietly and any
/// other fetch error abandons the video, in both cases returning whatever was
/// collected before the failing page.
pub async fn scan_video(
    api: &dyn YoutubeApi,
    credential: &Credential,
    video_id: &str,
    matcher: &BlocklistMatcher,
    on_progress: Progress<'_>,
) -> Vec<String> {
    on_progress(format!("Fetching comments for video ID: {}...", video_id));

    let mut flagged = Vec::new();
    let mut thread_count = 0usize;
    let mut page_token: Option<String> = None;

    loop {
        let page = match api
            .comment_threads(
                credential,
                video_id,
                COMMENT_THREAD_PAGE_SIZE,
                page_token.as_deref(),
            )
            .await
        {
            Ok(page) => page,
            Err(e) if e.is_comments_disabled() => {
                debug!(video_id = %video_id, "Comments disabled");
                on_progress(format!(
                    "Comments are disabled for video {}. Skipping.",
                    video_id
                ));
                return flagged;
            }
            Err(e) => {
                warn!(video_id = %video_id, error = %e, "Error fetching comments, skipping video");
                on_progress(format!("Error fetching comments for {}: {}", video_id, e));
                return flagged;
            }
        };

        thread_count += page.items.len();
        on_progress(format!(
            "Fetched {} comment threads for {}...",
            thread_count, video_id
        ));

        let comments = page.items.iter().filter_map(|thread| {
            Some(CommentRef {
                id: thread.top_level_comment_id()?,
                display_text: thread.top_level_text().unwrap_or_default(),
            })
        });
        for comment in comments {
            if matcher.is_spam(comment.display_text) {
                debug!(video_id = %video_id, comment_id = %comment.id, "Flagged comment");
                flagged.push(comment.id.to_string());
            }
        }

        match page.next_cursor() {
            Some(next) => page_token = Some(next.to_string()),
            None => break,
        }
    }

    info!(
        video_id = %video_id,
        threads = thread_count,
        flagged = flagged.len(),
        "Finished scanning comments"
    );
    on_progress(format!(
        "Finished fetching comments for {}. Found {} potential spam comments.",
        video_id,
        flagged.len()
    ));
    flagged
}

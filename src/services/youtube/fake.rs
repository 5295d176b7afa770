//! Scripted in-memory [YoutubeApi] for pipeline tests

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use super::types::{
    CommentSnippet, CommentThread, CommentThreadSnippet, Comment, Page, PlaylistItem,
    PlaylistItemSnippet, ResourceId,
};
use super::{Credential, YoutubeApi, YoutubeError};

type Scripted<T> = Result<Page<T>, FakeError>;

/// Error recipe, rebuilt on every call since [YoutubeError] is not `Clone`
#[derive(Debug, Clone)]
pub enum FakeError {
    CommentsDisabled,
    Api(u16, &'static str),
    Unauthorized,
}

impl FakeError {
    fn build(&self) -> YoutubeError {
        match self {
            Self::CommentsDisabled => YoutubeError::Api {
                status: 403,
                reason: Some("commentsDisabled".to_string()),
                message: "The video identified by the videoId parameter has disabled comments."
                    .to_string(),
            },
            Self::Api(status, message) => YoutubeError::Api {
                status: *status,
                reason: None,
                message: message.to_string(),
            },
            Self::Unauthorized => YoutubeError::Unauthorized("Invalid Credentials".to_string()),
        }
    }
}

fn page<T>(items: Vec<T>, next: Option<&str>) -> Page<T> {
    Page {
        items,
        next_page_token: next.map(str::to_string),
    }
}

pub fn video(id: &str, title: &str) -> PlaylistItem {
    PlaylistItem {
        snippet: Some(PlaylistItemSnippet {
            title: Some(title.to_string()),
            resource_id: Some(ResourceId {
                video_id: Some(id.to_string()),
            }),
        }),
    }
}

/// A playlist entry whose video has been removed (no video id)
pub fn orphan(title: &str) -> PlaylistItem {
    PlaylistItem {
        snippet: Some(PlaylistItemSnippet {
            title: Some(title.to_string()),
            resource_id: None,
        }),
    }
}

pub fn thread(comment_id: &str, text: &str) -> CommentThread {
    CommentThread {
        snippet: Some(CommentThreadSnippet {
            top_level_comment: Some(Comment {
                id: Some(comment_id.to_string()),
                snippet: Some(CommentSnippet {
                    text_display: Some(text.to_string()),
                }),
            }),
        }),
    }
}

#[derive(Default)]
struct State {
    uploads: Option<Result<Option<String>, FakeError>>,
    /// Playlist pages keyed by the token used to request them
    playlist_pages: HashMap<Option<String>, Scripted<PlaylistItem>>,
    /// Comment pages keyed by (video id, token)
    comment_pages: HashMap<(String, Option<String>), Scripted<CommentThread>>,
    failing_deletes: HashSet<String>,
    deleted: Vec<String>,
    calls: Vec<String>,
}

/// Scripted fake. Unscripted playlist or comment requests return an empty last page.
#[derive(Default, Clone)]
pub struct FakeYoutube {
    state: Arc<Mutex<State>>,
    gate: Option<Arc<Notify>>,
}

impl FakeYoutube {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_uploads(self, playlist_id: &str) -> Self {
        self.state.lock().uploads = Some(Ok(Some(playlist_id.to_string())));
        self
    }

    pub fn without_uploads(self) -> Self {
        self.state.lock().uploads = Some(Ok(None));
        self
    }

    pub fn with_uploads_error(self, error: FakeError) -> Self {
        self.state.lock().uploads = Some(Err(error));
        self
    }

    pub fn with_playlist_page(
        self,
        token: Option<&str>,
        items: Vec<PlaylistItem>,
        next: Option<&str>,
    ) -> Self {
        self.state
            .lock()
            .playlist_pages
            .insert(token.map(str::to_string), Ok(page(items, next)));
        self
    }

    pub fn with_playlist_error(self, token: Option<&str>, error: FakeError) -> Self {
        self.state
            .lock()
            .playlist_pages
            .insert(token.map(str::to_string), Err(error));
        self
    }

    pub fn with_comment_page(
        self,
        video_id: &str,
        token: Option<&str>,
        threads: Vec<CommentThread>,
        next: Option<&str>,
    ) -> Self {
        self.state.lock().comment_pages.insert(
            (video_id.to_string(), token.map(str::to_string)),
            Ok(page(threads, next)),
        );
        self
    }

    pub fn with_comment_error(self, video_id: &str, token: Option<&str>, error: FakeError) -> Self {
        self.state.lock().comment_pages.insert(
            (video_id.to_string(), token.map(str::to_string)),
            Err(error),
        );
        self
    }

    pub fn with_failing_delete(self, comment_id: &str) -> Self {
        self.state
            .lock()
            .failing_deletes
            .insert(comment_id.to_string());
        self
    }

    /// Block the uploads lookup until the returned handle is notified.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Comment ids that were successfully deleted, in order
    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().deleted.clone()
    }

    /// Log of every call made, e.g. `comments:vid1:None`
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }
}

#[async_trait]
impl YoutubeApi for FakeYoutube {
    async fn channel_uploads(
        &self,
        _credential: &Credential,
        channel_id: &str,
    ) -> Result<Option<String>, YoutubeError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let mut state = self.state.lock();
        state.calls.push(format!("channel:{}", channel_id));
        match state.uploads.clone() {
            Some(Ok(uploads)) => Ok(uploads),
            Some(Err(e)) => Err(e.build()),
            None => Ok(None),
        }
    }

    async fn playlist_items(
        &self,
        _credential: &Credential,
        playlist_id: &str,
        _page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<PlaylistItem>, YoutubeError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(format!("playlist:{}:{:?}", playlist_id, page_token));
        match state.playlist_pages.get(&page_token.map(str::to_string)) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(e)) => Err(e.build()),
            None => Ok(page(Vec::new(), None)),
        }
    }

    async fn comment_threads(
        &self,
        _credential: &Credential,
        video_id: &str,
        _page_size: u32,
        page_token: Option<&str>,
    ) -> Result<Page<CommentThread>, YoutubeError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(format!("comments:{}:{:?}", video_id, page_token));
        let key = (video_id.to_string(), page_token.map(str::to_string));
        match state.comment_pages.get(&key) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(e)) => Err(e.build()),
            None => Ok(page(Vec::new(), None)),
        }
    }

    async fn delete_comment(
        &self,
        _credential: &Credential,
        comment_id: &str,
    ) -> Result<(), YoutubeError> {
        let mut state = self.state.lock();
        state.calls.push(format!("delete:{}", comment_id));
        if state.failing_deletes.contains(comment_id) {
            return Err(FakeError::Api(403, "The comment could not be deleted.").build());
        }
        state.deleted.push(comment_id.to_string());
        Ok(())
    }
}

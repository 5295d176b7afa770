//! Scan pipeline components and external service integrations

pub mod blocklist;
pub mod comments;
pub mod deletion;
pub mod rate_limiter;
pub mod videos;
pub mod youtube;

pub use blocklist::BlocklistMatcher;
pub use youtube::{Credential, YoutubeApi, YoutubeClient};

/// Fire-and-forget progress sink. Messages end up in the job status.
pub type Progress<'a> = &'a (dyn Fn(String) + Send + Sync);

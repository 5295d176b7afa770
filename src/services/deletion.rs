//! Best-effort comment deletion

use tracing::{info, warn};

use super::Progress;
use super::youtube::{Credential, YoutubeApi};

/// Tally of a deletion batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub succeeded: usize,
    pub failed: usize,
}

/// Delete each comment in turn. A failure is counted and the batch moves on;
/// nothing is retried.
pub async fn delete_comments(
    api: &dyn YoutubeApi,
    credential: &Credential,
    comment_ids: &[String],
    on_progress: Progress<'_>,
) -> DeletionOutcome {
    let mut outcome = DeletionOutcome::default();
    if comment_ids.is_empty() {
        return outcome;
    }

    let total = comment_ids.len();
    on_progress(format!("Attempting to delete {} comments...", total));

    for comment_id in comment_ids {
        match api.delete_comment(credential, comment_id).await {
            Ok(()) => {
                outcome.succeeded += 1;
                on_progress(format!("Deleted comment {}/{}...", outcome.succeeded, total));
            }
            Err(e) => {
                outcome.failed += 1;
                warn!(comment_id = %comment_id, error = %e, "Failed to delete comment");
                on_progress(format!(
                    "Failed to delete comment {}. Total failed: {}",
                    comment_id, outcome.failed
                ));
            }
        }
    }

    info!(succeeded = outcome.succeeded, failed = outcome.failed, "Finished deleting comments");
    on_progress(format!(
        "Finished deleting comments. Success: {}, Failed: {}.",
        outcome.succeeded, outcome.failed
    ));
    outcome
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::services::youtube::fake::FakeYoutube;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let api = FakeYoutube::new();
        let outcome = delete_comments(&api, &Credential::new("t"), &[], &|_| {}).await;

        assert_eq!(outcome, DeletionOutcome { succeeded: 0, failed: 0 });
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let api = FakeYoutube::new().with_failing_delete("c2");
        let outcome = delete_comments(
            &api,
            &Credential::new("t"),
            &ids(&["c1", "c2", "c3"]),
            &|_| {},
        )
        .await;

        assert_eq!(outcome, DeletionOutcome { succeeded: 2, failed: 1 });
        assert_eq!(api.deleted(), vec!["c1", "c3"]);
        assert_eq!(api.calls(), vec!["delete:c1", "delete:c2", "delete:c3"]);
    }

    #[tokio::test]
    async fn test_progress_reported_per_attempt() {
        let api = FakeYoutube::new().with_failing_delete("c1");
        let messages = parking_lot::Mutex::new(Vec::new());
        delete_comments(&api, &Credential::new("t"), &ids(&["c1", "c2"]), &|m| {
            messages.lock().push(m)
        })
        .await;

        assert_eq!(
            messages.into_inner(),
            vec![
                "Attempting to delete 2 comments...",
                "Failed to delete comment c1. Total failed: 1",
                "Deleted comment 1/2...",
                "Finished deleting comments. Success: 1, Failed: 1.",
            ]
        );
    }
}

//! Process-wide status of the spam scan job
//!
//! The store holds the single [ScanJob] for the process. State transitions go
//! through [JobStatusStore::try_start], [JobStatusStore::complete] and
//! [JobStatusStore::fail]; the orchestrator mutates counters through
//! [JobStatusStore::update]. Every read and write takes the lock for the whole
//! operation, so a snapshot never mixes two updates.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Counters and progress text published while a scan runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanProgress {
    pub message: String,
    pub current_video: String,
    pub videos_processed: usize,
    pub total_videos: usize,
    pub spam_found: usize,
    pub spam_deleted: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanJob {
    pub job_id: Option<Uuid>,
    pub state: JobState,
    #[serde(flatten)]
    pub progress: ScanProgress,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl ScanJob {
    fn idle() -> Self {
        Self {
            job_id: None,
            state: JobState::Idle,
            progress: ScanProgress {
                message: "Idle".to_string(),
                ..Default::default()
            },
            error: None,
            started_at: None,
            finished_at: None,
        }
    }

    fn started(now: DateTime<Utc>) -> Self {
        Self {
            job_id: Some(Uuid::new_v4()),
            state: JobState::Running,
            progress: ScanProgress {
                message: "Initializing scan...".to_string(),
                ..Default::default()
            },
            error: None,
            started_at: Some(now),
            finished_at: None,
        }
    }
}

/// Immutable copy of the job, as served to pollers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSnapshot {
    #[serde(flatten)]
    pub job: ScanJob,
    pub is_running: bool,
    /// Whole seconds since start, only while running
    pub duration_seconds: Option<i64>,
}

pub struct JobStatusStore {
    job: RwLock<ScanJob>,
}

impl Default for JobStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JobStatusStore {
    pub fn new() -> Self {
        Self {
            job: RwLock::new(ScanJob::idle()),
        }
    }

    /// Reset the job and mark it running. Returns `None` without touching
    /// anything if a job is already running.
    pub fn try_start(&self) -> Option<Uuid> {
        let mut job = self.job.write();
        if job.state == JobState::Running {
            return None;
        }
        *job = ScanJob::started(Utc::now());
        job.job_id
    }

    /// Apply a progress mutation. Ignored unless a job is running.
    pub fn update(&self, mutate: impl FnOnce(&mut ScanProgress)) {
        let mut job = self.job.write();
        if job.state != JobState::Running {
            warn!("Ignoring progress update for a job that is not running");
            return;
        }
        mutate(&mut job.progress);
        debug_assert!(job.progress.spam_deleted <= job.progress.spam_found);
        debug_assert!(
            job.progress.total_videos == 0
                || job.progress.videos_processed <= job.progress.total_videos
        );
    }

    pub fn set_message(&self, message: impl Into<String>) {
        let message = message.into();
        self.update(|p| p.message = message);
    }

    /// Transition Running -> Completed
    pub fn complete(&self, message: impl Into<String>) {
        self.finish(JobState::Completed, message.into(), None);
    }

    /// Transition Running -> Failed
    pub fn fail(&self, error: impl Into<String>) {
        let error = error.into();
        self.finish(JobState::Failed, format!("Scan failed: {}", error), Some(error));
    }

    fn finish(&self, state: JobState, message: String, error: Option<String>) {
        let mut job = self.job.write();
        if job.state != JobState::Running {
            warn!(state = ?job.state, "Job already finished, ignoring transition to {:?}", state);
            return;
        }
        job.state = state;
        job.progress.message = message;
        job.progress.current_video.clear();
        job.error = error;
        job.finished_at = Some(Utc::now());
        info!(
            job_id = ?job.job_id,
            state = ?job.state,
            message = %job.progress.message,
            "Scan finished"
        );
    }

    pub fn snapshot(&self) -> JobSnapshot {
        self.snapshot_at(Utc::now())
    }

    fn snapshot_at(&self, now: DateTime<Utc>) -> JobSnapshot {
        let job = self.job.read().clone();
        let is_running = job.state == JobState::Running;
        let duration_seconds = job
            .started_at
            .filter(|_| is_running)
            .map(|started| ((now - started).num_milliseconds() as f64 / 1000.0).round() as i64);
        JobSnapshot {
            job,
            is_running,
            duration_seconds,
        }
    }
}

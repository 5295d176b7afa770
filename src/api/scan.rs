//! Spam scan job control

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use uuid::Uuid;

use super::ApiError;
use crate::app::AppState;
use crate::jobs::JobSnapshot;
use crate::services::Credential;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStartedResponse {
    pub message: &'static str,
    pub job_id: Uuid,
}

/// Start a scan of the configured channel. Returns 202 as soon as the job is
/// launched; progress is read from the status endpoint.
async fn start_scan(
    State(state): State<AppState>,
    credential: Credential,
) -> Result<(StatusCode, Json<ScanStartedResponse>), ApiError> {
    let job_id = state.scanner.start(credential)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(ScanStartedResponse {
            message: "Scan initiated.",
            job_id,
        }),
    ))
}

/// Current (or last) scan status
async fn scan_status(State(state): State<AppState>, _credential: Credential) -> Json<JobSnapshot> {
    Json(state.scanner.status().snapshot())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/youtube/scan", get(scan_status).post(start_scan))
}

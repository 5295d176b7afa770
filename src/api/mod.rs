//! API route definitions
//!
//! `/api/youtube/scan` starts a scan (POST) or reports its status (GET).
//! Health endpoints live at the root and need no credential.

pub mod auth;
pub mod health;
pub mod scan;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::jobs::ScanAlreadyRunning;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors surfaced to HTTP callers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: No valid token found.")]
    MissingCredential,

    #[error("Refresh token failed. Please log in again.")]
    RefreshFailed,

    #[error(transparent)]
    Conflict(#[from] ScanAlreadyRunning),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredential | Self::RefreshFailed => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = Json(ErrorResponse {
            error: self.to_string(),
        });
        (self.status_code(), payload).into_response()
    }
}

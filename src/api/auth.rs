//! Bearer credential extraction
//!
//! Token issuance and refresh belong to the identity layer in front of this
//! service. Here the credential is only lifted out of the request; a refresh
//! failure flagged by that layer is treated as unauthorized.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::ApiError;
use crate::services::Credential;

/// Header set by the identity layer when the access token could not be refreshed
pub const AUTH_ERROR_HEADER: &str = "x-auth-error";

const REFRESH_FAILED: &str = "RefreshAccessTokenError";

/// Extract bearer token from Authorization header
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn refresh_failed(headers: &HeaderMap) -> bool {
    headers
        .get(AUTH_ERROR_HEADER)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| v == REFRESH_FAILED)
}

impl<S> FromRequestParts<S> for Credential
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if refresh_failed(&parts.headers) {
            return Err(ApiError::RefreshFailed);
        }
        extract_token(&parts.headers)
            .map(Credential::new)
            .ok_or(ApiError::MissingCredential)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn test_extract_bearer_token() {
        let map = headers(&[("authorization", "Bearer ya29.token")]);
        assert_eq!(extract_token(&map).as_deref(), Some("ya29.token"));
    }

    #[test]
    fn test_rejects_other_schemes_and_blank_tokens() {
        assert_eq!(extract_token(&headers(&[("authorization", "Basic abc")])), None);
        assert_eq!(extract_token(&headers(&[("authorization", "Bearer   ")])), None);
        assert_eq!(extract_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_refresh_failure_header() {
        assert!(refresh_failed(&headers(&[(AUTH_ERROR_HEADER, "RefreshAccessTokenError")])));
        assert!(!refresh_failed(&headers(&[(AUTH_ERROR_HEADER, "other")])));
        assert!(!refresh_failed(&HeaderMap::new()));
    }
}

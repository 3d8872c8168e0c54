//! Shared plumbing for calls to collaborator services (profile, notification).
use std::time::Duration;

use thiserror::Error;

/// Failure of a collaborator call.
///
/// Never mapped into an HTTP response: callers log it and fall back to local data
/// or skip the side effect.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("not found upstream")]
    NotFound,
    #[error("upstream returned status {0}")]
    Status(u16),
    #[error("upstream transport error: {0}")]
    Transport(String),
    #[error("upstream call timed out")]
    Timeout,
    #[error("invalid upstream payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else if e.is_decode() {
            UpstreamError::Decode(e.to_string())
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }
}

/// HTTP client for collaborator calls; every request is bounded by `timeout`.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, UpstreamError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()
        .map_err(|e| UpstreamError::Transport(e.to_string()))
}

//! Upstream fetch port.

use async_trait::async_trait;

use crate::error::FetchError;

/// Issues exactly one outbound GET per call and classifies the response.
///
/// # Errors
///
/// - HTTP 429 → [`FetchError::RateLimited`]
/// - other non-success status → [`FetchError::RequestFailed`]
/// - DNS, connect, timeout, reset → [`FetchError::Transport`]
///
/// Implementations never retry; the caller decides what to do with a
/// rate-limit rejection.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and return the raw response body.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

//! reqwest-based [`Fetcher`].
//!
//! One GET per call. The response status is classified before the body is
//! handed back; nothing is retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, trace};

use crate::error::{Error, FetchError, Result};
use crate::port::outbound::fetch::Fetcher;

/// Longest upstream error body carried into a [`FetchError::RequestFailed`].
const MAX_ERROR_BODY: usize = 200;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the upstream market API.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Connection(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, FetchError> {
        trace!(url, "GET");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        debug!(url, status = status.as_u16(), bytes = body.len(), "Upstream response");
        classify(status, body.to_vec())
    }
}

/// Map a status and body to the fetch outcome.
pub(crate) fn classify(
    status: StatusCode,
    body: Vec<u8>,
) -> std::result::Result<Vec<u8>, FetchError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited {
            status: status.as_u16(),
        });
    }
    if !status.is_success() {
        return Err(FetchError::RequestFailed {
            status: status.as_u16(),
            message: error_message(status, &body),
        });
    }
    Ok(body)
}

fn error_message(status: StatusCode, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string();
    }
    text.chars().take(MAX_ERROR_BODY).collect()
}

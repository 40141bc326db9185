//! HTTP client collaborator
//!
//! Periodic fetch flows need exactly one operation: GET a URL and get
//! text back. Network failures and non-success statuses both reject so
//! the tick is treated as a no-op by the poller.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{PollError, Result};

/// Default request timeout for [`ReqwestClient`]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Performs an HTTP GET and returns the response body as text
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url`, resolving to the body text
    ///
    /// Fails with [`PollError::RefreshFailed`] on network errors and
    /// [`PollError::HttpStatus`] on a non-2xx response.
    async fn get(&self, url: &str) -> Result<String>;
}

/// Default client backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Create a client with [`DEFAULT_TIMEOUT`]
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PollError::Init(format!("http client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PollError::RefreshFailed(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PollError::HttpStatus(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| PollError::MalformedResponse(format!("body read failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        assert!(ReqwestClient::new().is_ok());
        assert!(ReqwestClient::with_timeout(Duration::from_secs(1)).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_refresh_failed() {
        // Reserved TEST-NET-1 address; connection should fail fast with
        // the short timeout
        let client = ReqwestClient::with_timeout(Duration::from_millis(250)).unwrap();
        let result = client.get("http://192.0.2.1:9/").await;

        assert!(matches!(result, Err(PollError::RefreshFailed(_))));
    }
}

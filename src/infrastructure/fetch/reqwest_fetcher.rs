use crate::domain::error::DomainError;
use crate::domain::ports::http_fetcher::{FetchedBody, HttpFetcher};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// `reqwest` backed fetcher with a per-request timeout and a body size cap.
pub struct ReqwestFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl ReqwestFetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("visual-matcher/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            max_bytes,
        }
    }
}

impl Default for ReqwestFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_TIMEOUT, 20 * 1024 * 1024)
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<FetchedBody, DomainError> {
        let mut resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                DomainError::Fetch(format!("timed out fetching {url}"))
            } else {
                DomainError::Fetch(format!("request to {url} failed: {e}"))
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DomainError::Fetch(format!("{url} returned {status}")));
        }

        if let Some(len) = resp.content_length() {
            if len as usize > self.max_bytes {
                return Err(DomainError::Fetch(format!(
                    "{url} is too large ({len} bytes, limit {})",
                    self.max_bytes
                )));
            }
        }

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        // Content-Length is optional, so the cap is enforced while streaming.
        let mut bytes = Vec::new();
        while let Some(chunk) = resp.chunk().await.map_err(|e| {
            if e.is_timeout() {
                DomainError::Fetch(format!("timed out reading {url}"))
            } else {
                DomainError::Fetch(format!("failed reading body of {url}: {e}"))
            }
        })? {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(DomainError::Fetch(format!(
                    "{url} is too large (over {} bytes)",
                    self.max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(FetchedBody {
            content_type,
            bytes,
        })
    }
}

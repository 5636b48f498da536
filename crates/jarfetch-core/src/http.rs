//! Thin HTTP client used for repository probes and artifact downloads.
//!
//! Wraps a shared [`reqwest::Client`] configured with a fixed connect timeout
//! and redirect following. There is no retry logic and no response caching:
//! the on-disk jar cache is the only cache in the system.

use crate::error::{CoreError, Result};
use bytes::Bytes;
use std::time::Duration;

/// Connect timeout applied when none is configured.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("jarfetch/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 10;

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_connect_timeout(DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_connect_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|source| CoreError::Http {
                url: String::new(),
                source,
            })?;
        Ok(Self { client })
    }

    /// Downloads the full body of `url`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Http`] on transport failure and
    /// [`CoreError::Status`] for any non-2xx response.
    pub async fn get_bytes(&self, url: &str) -> Result<Bytes> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| CoreError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.bytes().await.map_err(|source| CoreError::Http {
            url: url.to_string(),
            source,
        })
    }

    /// Downloads `url` and decodes the body as UTF-8 text.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let body = self.get_bytes(url).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Issues a HEAD request and reports whether the server answered 2xx.
    ///
    /// Non-2xx statuses are `Ok(false)`; only transport failures are errors.
    pub async fn exists(&self, url: &str) -> Result<bool> {
        tracing::debug!("HEAD {}", url);
        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|source| CoreError::Http {
                url: url.to_string(),
                source,
            })?;
        Ok(response.status().is_success())
    }
}

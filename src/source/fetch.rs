//! HTTP fetcher backed by [`reqwest`].
//!
//! One GET per call, with a bounded connect phase and a bounded gap between
//! body reads.  No retries: a failed attempt is reported and the caller
//! decides what to do next.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use super::Fetcher;
use crate::error::FetchError;

/// Connect and read timeouts applied to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Upper bound on establishing the TCP/TLS connection.
    pub connect: Duration,
    /// Upper bound on waiting for the next chunk of the response.
    pub read: Duration,
}

impl Timeouts {
    pub const DEFAULT_CONNECT_MS: u64 = 15_000;
    pub const DEFAULT_READ_MS: u64 = 10_000;

    pub fn from_millis(connect_ms: u64, read_ms: u64) -> Self {
        Self {
            connect: Duration::from_millis(connect_ms),
            read: Duration::from_millis(read_ms),
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::from_millis(Self::DEFAULT_CONNECT_MS, Self::DEFAULT_READ_MS)
    }
}

/// Fetches response bodies over HTTP(S).
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a fetcher whose client enforces `timeouts` on every request.
    pub fn new(timeouts: Timeouts) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeouts.connect)
            .read_timeout(timeouts.read)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let url = validate_url(url)?;
        let connection_failure = |e: reqwest::Error| FetchError::ConnectionFailure {
            url: url.to_string(),
            reason: e.to_string(),
        };

        debug!(%url, "sending GET");
        // The response owns the connection; every return below drops it.
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(connection_failure)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(connection_failure)?;
        debug!(%url, bytes = body.len(), "response received");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Accept only absolute `http`/`https` URLs.
fn validate_url(raw: &str) -> Result<Url, FetchError> {
    let malformed = |reason: String| FetchError::UrlMalformed {
        url: raw.to_string(),
        reason,
    };

    let url = Url::parse(raw).map_err(|e| malformed(e.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        "http" | "https" => Err(malformed("missing host".into())),
        other => Err(malformed(format!("unsupported scheme `{other}`"))),
    }
}

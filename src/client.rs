use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT};
use reqwest::StatusCode;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Awaited before every outbound request; the exchange throttles
/// aggressive clients.
pub const POLITENESS_DELAY: Duration = Duration::from_millis(500);

// The exchange rejects requests with a default library User-Agent.
const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Shared HTTP client for all exchange endpoints: browser-like headers,
/// a fixed per-request timeout, no retries.
pub struct BseClient {
    http: reqwest::Client,
    delay: Duration,
}

/// Raw fetch outcome; callers judge the status themselves.
pub struct Fetched {
    pub status: StatusCode,
    pub body: String,
}

impl BseClient {
    pub fn new() -> Result<Self> {
        Self::with_delay(POLITENESS_DELAY)
    }

    pub fn with_delay(delay: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(
            HeaderName::from_static("upgrade-insecure-requests"),
            HeaderValue::from_static("1"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http, delay })
    }

    /// GET a URL after the politeness delay. Transport failures surface as
    /// `Err`; non-success statuses come back in `Fetched`.
    pub async fn get(&self, url: &str) -> Result<Fetched> {
        tokio::time::sleep(self.delay).await;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(Fetched { status, body })
    }
}

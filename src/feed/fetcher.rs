use crate::feed::model::Feed;
use crate::feed::parser::{parse_feed, ParseError};
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_secs(2);

/// Errors that can occur while fetching a feed.
///
/// Covers the full lifecycle of a fetch: URL checks, network issues, HTTP
/// errors, and (for [`fetch_and_parse`]) parsing failures.
#[derive(Debug, Error)]
pub enum FetchError {
    /// URL could not be parsed or is not http(s)
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Server returned 429 Too Many Requests after max retries
    #[error("Rate limited after {0} retries")]
    RateLimited(u32),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    /// Body was fetched but is not a usable RSS document
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Limits applied to a single fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-attempt timeout covering headers and body (each retry gets a fresh one)
    pub timeout: Duration,
    /// Largest accepted response body in bytes
    pub max_bytes: usize,
    /// Retries for 429, 5xx and truncated bodies
    pub max_retries: u32,
    /// First backoff delay; doubles on each retry
    pub retry_base_delay: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_bytes: DEFAULT_MAX_FEED_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
        }
    }
}

impl FetchOptions {
    fn backoff(&self, retry: u32) -> Duration {
        self.retry_base_delay.saturating_mul(2u32.saturating_pow(retry))
    }
}

/// Builds the HTTP client used for feed requests.
pub fn build_client(user_agent: &str) -> Result<reqwest::Client, FetchError> {
    Ok(reqwest::Client::builder().user_agent(user_agent).build()?)
}

/// Checks that `url` parses and uses http or https.
pub fn validate_feed_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url.trim()).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(FetchError::InvalidUrl(format!(
            "unsupported scheme: {scheme} (only http/https allowed)"
        ))),
    }
}

/// Fetches a feed and parses the body into a [`Feed`].
///
/// # Errors
///
/// Any [`FetchError`] from [`fetch_feed`], or [`FetchError::Parse`] when the
/// body is not a well-formed RSS document.
pub async fn fetch_and_parse(
    client: &reqwest::Client,
    url: &str,
    options: &FetchOptions,
) -> Result<Feed, FetchError> {
    let bytes = fetch_feed(client, url, options).await?;
    let feed = parse_feed(&bytes)?;
    Ok(feed)
}

/// Fetches the raw body of a feed URL.
///
/// # Behavior
///
/// - Each attempt (headers and body) is bounded by `options.timeout`
/// - HTTP 429 and 5xx responses are retried with exponential backoff, up to
///   `options.max_retries` times
/// - Bodies shorter than their Content-Length are retried the same way
/// - Other non-2xx statuses fail immediately
/// - Bodies larger than `options.max_bytes` are rejected
///
/// # Errors
///
/// - [`FetchError::InvalidUrl`] - Unparseable or non-http(s) URL
/// - [`FetchError::Network`] - Connection or TLS errors
/// - [`FetchError::Timeout`] - Request exceeded the timeout
/// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
/// - [`FetchError::RateLimited`] - 429 response after max retries
/// - [`FetchError::ResponseTooLarge`] - Response exceeded the size limit
/// - [`FetchError::IncompleteResponse`] - Truncated body after max retries
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    options: &FetchOptions,
) -> Result<Vec<u8>, FetchError> {
    let url = validate_feed_url(url)?;
    let mut retry_count = 0;

    loop {
        // One deadline per attempt covers both the headers and the body
        let deadline = tokio::time::Instant::now() + options.timeout;
        let response = tokio::time::timeout_at(deadline, client.get(url.clone()).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::Network)?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            if retry_count >= options.max_retries {
                return Err(FetchError::RateLimited(options.max_retries));
            }

            let delay = options.backoff(retry_count);
            tracing::warn!(
                feed = %url,
                retry = retry_count,
                delay_ms = delay.as_millis() as u64,
                "Rate limited, backing off"
            );

            tokio::time::sleep(delay).await;
            retry_count += 1;
            continue;
        }

        if status.is_server_error() {
            if retry_count >= options.max_retries {
                return Err(FetchError::HttpStatus(status.as_u16()));
            }

            let delay = options.backoff(retry_count);
            tracing::warn!(
                feed = %url,
                status = %status,
                retry = retry_count,
                delay_ms = delay.as_millis() as u64,
                "Server error, retrying after delay"
            );

            tokio::time::sleep(delay).await;
            retry_count += 1;
            continue;
        }

        // 4xx and other non-success statuses fail immediately
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = read_limited_bytes(response, options.max_bytes);
        let body = tokio::time::timeout_at(deadline, body)
            .await
            .map_err(|_| FetchError::Timeout)?;

        match body {
            Ok(bytes) => {
                tracing::debug!(feed = %url, bytes = bytes.len(), "Fetched feed");
                return Ok(bytes);
            }
            Err(FetchError::IncompleteResponse { expected, received }) => {
                if retry_count >= options.max_retries {
                    return Err(FetchError::IncompleteResponse { expected, received });
                }

                let delay = options.backoff(retry_count);
                tracing::debug!(
                    feed = %url,
                    expected = expected,
                    received = received,
                    attempt = retry_count + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying incomplete download"
                );

                tokio::time::sleep(delay).await;
                retry_count += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}

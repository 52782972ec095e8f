//! Comment source adapter.
//!
//! Fetches one page of replay comments at a time, keyed by video id plus
//! either a starting offset or an opaque cursor, retrying transient failures
//! with exponential backoff.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use chatpeaks_models::ChatMessage;

use crate::error::{ChatError, ChatResult};
use crate::gql::{decode_page, GqlRequest};
use crate::metrics::{record_page_fetched, record_retry};

/// One decoded page of the comment feed.
#[derive(Debug, Clone, Default)]
pub struct CommentPage {
    /// Messages in source order
    pub messages: Vec<ChatMessage>,
    /// Cursor for the next page, absent on the last page
    pub next_cursor: Option<String>,
}

/// Position marker for a page fetch.
///
/// Exactly one of the two is authoritative per call; a cursor always takes
/// precedence over an offset by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagePosition {
    /// Seed the walk at a time offset in seconds
    Offset(u32),
    /// Continue from an opaque pagination token
    Cursor(String),
}

/// Anything that can serve comment pages: the live GQL client in production,
/// an in-memory fake in tests.
pub trait CommentSource {
    fn fetch_page(
        &self,
        video_id: &str,
        position: PagePosition,
    ) -> impl Future<Output = ChatResult<CommentPage>> + Send;
}

/// Configuration for the comment client.
#[derive(Debug, Clone)]
pub struct CommentClientConfig {
    /// GQL endpoint URL
    pub gql_url: String,
    /// Client identifier sent with every request
    pub client_id: String,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Base delay for exponential backoff
    pub backoff_base: Duration,
}

impl Default for CommentClientConfig {
    fn default() -> Self {
        Self {
            gql_url: "https://gql.twitch.tv/gql".to_string(),
            client_id: "kimne78kx3ncx6brgo4mv6wki5h1ko".to_string(),
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl CommentClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            gql_url: std::env::var("CHAT_GQL_URL").unwrap_or(defaults.gql_url),
            client_id: std::env::var("CHAT_CLIENT_ID").unwrap_or(defaults.client_id),
            request_timeout: Duration::from_secs(
                std::env::var("CHAT_REQUEST_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            max_retries: defaults.max_retries,
            backoff_base: defaults.backoff_base,
        }
    }
}

/// HTTP client for the comment feed.
pub struct CommentClient {
    http: Client,
    config: CommentClientConfig,
}

impl CommentClient {
    /// Create a new comment client.
    pub fn new(config: CommentClientConfig) -> ChatResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ChatError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ChatResult<Self> {
        Self::new(CommentClientConfig::from_env())
    }

    /// Issue one page request, without retry.
    async fn request_page(&self, video_id: &str, position: &PagePosition) -> ChatResult<CommentPage> {
        let (cursor, offset) = match position {
            PagePosition::Offset(offset) => (None, *offset),
            PagePosition::Cursor(cursor) => (Some(cursor.clone()), 0),
        };
        let request = GqlRequest::page(video_id, cursor, offset);

        let response = self
            .http
            .post(&self.config.gql_url)
            .header("Client-ID", &self.config.client_id)
            .json(&request)
            .send()
            .await
            .map_err(ChatError::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::status(status.as_u16(), &body));
        }

        let payload = response
            .json()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))?;

        decode_page(payload)
    }
}

impl CommentSource for CommentClient {
    async fn fetch_page(&self, video_id: &str, position: PagePosition) -> ChatResult<CommentPage> {
        debug!(video_id, ?position, "Fetching comment page");
        let page = with_retry(&self.config, || self.request_page(video_id, &position)).await?;
        record_page_fetched(page.messages.len());
        Ok(page)
    }
}

/// Execute a page fetch with retry on transient failures.
///
/// Backoff before attempt k is `base * 2^(k-1)`: 1s, 2s, 4s with the default
/// base. Each attempt is independent; the first success wins, and the loop
/// short-circuits on the first non-retryable error.
async fn with_retry<F, Fut>(config: &CommentClientConfig, operation: F) -> ChatResult<CommentPage>
where
    F: Fn() -> Fut,
    Fut: Future<Output = ChatResult<CommentPage>>,
{
    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        match operation().await {
            Ok(page) => return Ok(page),
            Err(e) if e.is_retryable() && attempt < config.max_retries => {
                let delay = config.backoff_base * 2u32.pow(attempt);
                warn!(
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Comment page fetch failed, retrying: {}",
                    e
                );
                record_retry();
                tokio::time::sleep(delay).await;
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| ChatError::Feed("retries exhausted".to_string())))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use chatpeaks_models::ChatMessage;

    #[test]
    fn test_config_defaults() {
        let config = CommentClientConfig::default();
        assert_eq!(config.gql_url, "https://gql.twitch.tv/gql");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.backoff_base, Duration::from_secs(1));
    }

    fn ok_page() -> CommentPage {
        CommentPage {
            messages: vec![ChatMessage::plain(0, "viewer", "hello")],
            next_cursor: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers_after_transient_failures() {
        // 503 twice, then success: three attempts, 1s + 2s of backoff.
        let config = CommentClientConfig::default();
        let attempts = AtomicU32::new(0);

        let started = tokio::time::Instant::now();
        let page = with_retry(&config, || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 2 {
                    Err(ChatError::status(503, "unavailable"))
                } else {
                    Ok(ok_page())
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert_eq!(page.messages.len(), 1);
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_gives_up_after_budget() {
        let config = CommentClientConfig::default();
        let attempts = AtomicU32::new(0);

        let started = tokio::time::Instant::now();
        let result = with_retry(&config, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err::<CommentPage, _>(ChatError::status(503, "unavailable")) }
        })
        .await;

        // Initial attempt plus three retries, backed off 1s + 2s + 4s
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        assert!(matches!(result, Err(ChatError::Status { status: 503, .. })));
        assert!(started.elapsed() >= Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_short_circuits_on_fatal_error() {
        let config = CommentClientConfig::default();
        let attempts = AtomicU32::new(0);

        let started = tokio::time::Instant::now();
        let result = with_retry(&config, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            async { Err::<CommentPage, _>(ChatError::status(404, "missing")) }
        })
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ChatError::Status { status: 404, .. })));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}

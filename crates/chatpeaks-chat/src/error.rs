//! Comment-feed error types.

use thiserror::Error;

/// Result type for comment-feed operations.
pub type ChatResult<T> = Result<T, ChatError>;

/// Errors that can occur while walking the comment feed.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Comment feed returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Comment feed error: {0}")]
    Feed(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Analysis budget exhausted")]
    Cancelled,
}

/// Substrings in a feed-level error message that suggest a transient failure.
const TRANSIENT_HINTS: [&str; 4] = ["timeout", "rate", "503", "502"];

impl ChatError {
    /// Build a fatal status error, truncating the body excerpt to 200 chars.
    pub fn status(status: u16, body: &str) -> Self {
        let excerpt: String = body.chars().take(200).collect();
        Self::Status {
            status,
            body: excerpt,
        }
    }

    /// Check if the error is worth retrying.
    ///
    /// Transport failures and 429/502/503 responses retry; feed-level errors
    /// retry only when the message hints at transience.
    pub fn is_retryable(&self) -> bool {
        match self {
            ChatError::Network(_) => true,
            ChatError::Status { status, .. } => matches!(status, 429 | 502 | 503),
            ChatError::Feed(message) => {
                let message = message.to_lowercase();
                TRANSIENT_HINTS.iter().any(|hint| message.contains(hint))
            }
            ChatError::Decode(_) | ChatError::Cancelled => false,
        }
    }

    /// True when this is the distinguished cancellation signal.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChatError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        assert!(ChatError::status(429, "slow down").is_retryable());
        assert!(ChatError::status(502, "").is_retryable());
        assert!(ChatError::status(503, "").is_retryable());
        assert!(!ChatError::status(400, "bad request").is_retryable());
        assert!(!ChatError::status(404, "").is_retryable());
        assert!(!ChatError::status(500, "").is_retryable());
    }

    #[test]
    fn test_feed_errors_retry_on_transient_hints() {
        assert!(ChatError::Feed("upstream Timeout while resolving".into()).is_retryable());
        assert!(ChatError::Feed("rate limit exceeded".into()).is_retryable());
        assert!(ChatError::Feed("got 503 from origin".into()).is_retryable());
        assert!(!ChatError::Feed("video is unavailable".into()).is_retryable());
    }

    #[test]
    fn test_decode_and_cancel_never_retry() {
        assert!(!ChatError::Decode("missing data".into()).is_retryable());
        assert!(!ChatError::Cancelled.is_retryable());
        assert!(ChatError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_status_truncates_body() {
        let long = "x".repeat(500);
        match ChatError::status(500, &long) {
            ChatError::Status { body, .. } => assert_eq!(body.len(), 200),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

//! Comment-feed metrics collection.

use metrics::counter;

/// Metric name constants for consistency.
pub mod names {
    /// Total comment pages fetched.
    pub const PAGES_FETCHED_TOTAL: &str = "chatpeaks_chat_pages_fetched_total";

    /// Total messages decoded from the feed.
    pub const MESSAGES_FETCHED_TOTAL: &str = "chatpeaks_chat_messages_fetched_total";

    /// Total fetch retry attempts.
    pub const RETRIES_TOTAL: &str = "chatpeaks_chat_retries_total";
}

/// Record a successfully fetched page.
pub fn record_page_fetched(message_count: usize) {
    counter!(names::PAGES_FETCHED_TOTAL).increment(1);
    counter!(names::MESSAGES_FETCHED_TOTAL).increment(message_count as u64);
}

/// Record a fetch retry.
pub fn record_retry() {
    counter!(names::RETRIES_TOTAL).increment(1);
}

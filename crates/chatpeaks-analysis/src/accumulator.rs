//! Windowed message accumulation.

use std::collections::BTreeMap;

use chatpeaks_models::{ChatBucket, ChatMessage, MAX_SAMPLE_MESSAGES, SAMPLE_TEXT_MAX_CHARS};

use crate::scorer::score_message;

/// Deposits scored messages into fixed-width time buckets.
///
/// Single-writer: the iterator callback feeds it sequentially, and the peak
/// detector reads the bucket map only after ingestion has completed.
pub struct WindowAccumulator {
    window_sec: u32,
    buckets: BTreeMap<u32, ChatBucket>,
    total_messages: u64,
}

impl WindowAccumulator {
    /// Create an accumulator with the given bucket width.
    pub fn new(window_sec: u32) -> Self {
        debug_assert!(window_sec > 0);
        Self {
            window_sec,
            buckets: BTreeMap::new(),
            total_messages: 0,
        }
    }

    /// Score a message and fold it into its window bucket.
    pub fn add_message(&mut self, msg: &ChatMessage) {
        let key = (msg.offset_seconds / self.window_sec) * self.window_sec;
        let bucket = self
            .buckets
            .entry(key)
            .or_insert_with(|| ChatBucket::new(key));

        bucket.message_count += 1;
        bucket.message_timestamps.push(msg.offset_seconds);
        self.total_messages += 1;

        let score = score_message(msg);
        bucket.reaction_score += score.reaction_score;
        bucket.emote_count += score.emote_count;
        bucket.category_scores.merge(&score.categories);

        if score.reaction_score > 0.0 && bucket.sample_messages.len() < MAX_SAMPLE_MESSAGES {
            let sample: String = msg.text.chars().take(SAMPLE_TEXT_MAX_CHARS).collect();
            bucket.sample_messages.push(sample);
        }
    }

    /// Read-only view of the bucket map.
    pub fn buckets(&self) -> &BTreeMap<u32, ChatBucket> {
        &self.buckets
    }

    /// Consume the accumulator, yielding the bucket map.
    pub fn into_buckets(self) -> BTreeMap<u32, ChatBucket> {
        self.buckets
    }

    /// Messages ingested so far.
    pub fn total_messages(&self) -> u64 {
        self.total_messages
    }

    /// Number of populated buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

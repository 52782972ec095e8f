//! Fixed-width time buckets produced by the window accumulator.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::category::CategoryScores;

/// Maximum number of sample messages retained per bucket.
pub const MAX_SAMPLE_MESSAGES: usize = 10;

/// Sample messages are truncated to this many characters.
pub const SAMPLE_TEXT_MAX_CHARS: usize = 80;

/// Aggregate of all messages whose offset falls inside one window.
///
/// Identified by `start_sec`, always a multiple of the window width. Missing
/// keys in the bucket map represent windows with zero messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChatBucket {
    /// Window start, in seconds from video start
    pub start_sec: u32,

    /// Number of messages deposited into this window
    pub message_count: u32,

    /// Sum of per-message reaction scores
    pub reaction_score: f64,

    /// Sum of per-message emote credits
    pub emote_count: u32,

    /// Additive per-category totals
    pub category_scores: CategoryScores,

    /// Raw message offsets, in deposit order, for burst detection
    pub message_timestamps: Vec<u32>,

    /// Up to [`MAX_SAMPLE_MESSAGES`] representative texts from scoring messages
    pub sample_messages: Vec<String>,
}

impl ChatBucket {
    /// Create an empty bucket for a window start.
    pub fn new(start_sec: u32) -> Self {
        Self {
            start_sec,
            message_count: 0,
            reaction_score: 0.0,
            emote_count: 0,
            category_scores: CategoryScores::default(),
            message_timestamps: Vec::new(),
            sample_messages: Vec::new(),
        }
    }
}

//! Surfaced moments and the analysis report.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::category::{Category, CategoryScores};

/// A clip-worthy time range surfaced by the peak detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Moment {
    /// Clip start, shifted back by the reaction delay
    pub start_sec: u32,

    /// Clip end; `end_sec - start_sec` equals the configured clip duration
    pub end_sec: u32,

    /// Composite window score that cleared the adaptive threshold
    pub score: f64,

    /// Message density over the window, rounded to one decimal
    pub messages_per_sec: f64,

    /// Messages in the merged window
    pub message_count: u32,

    /// Dominant reaction category
    pub tag: Category,

    /// Per-category score breakdown for the merged window
    pub category_scores: CategoryScores,

    /// Intra-window burst component of the score
    pub burst_score: f64,

    /// Representative chat lines from the window
    pub sample_messages: Vec<String>,
}

/// One populated bucket on the message-density timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TimelinePoint {
    /// Bucket start in seconds
    pub sec: u32,
    /// Messages in the bucket
    pub count: u32,
}

/// Result of one full chat analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisReport {
    /// The analyzed VOD id
    pub video_id: String,

    /// Total messages ingested (partial on budget exhaustion)
    pub total_messages: u64,

    /// Number of populated buckets
    pub buckets_analyzed: u32,

    /// Surfaced moments, chronological
    pub moments: Vec<Moment>,

    /// Per-bucket message counts, chronological, for plotting
    pub timeline: Vec<TimelinePoint>,

    /// True when the page budget or wall-clock ceiling cut ingestion short
    pub timed_out: bool,

    /// When the analysis completed
    pub analyzed_at: DateTime<Utc>,
}

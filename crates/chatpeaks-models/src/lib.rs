//! Shared data models for the chatpeaks backend.
//!
//! This crate provides Serde-serializable types for:
//! - Chat messages and their fragments
//! - Reaction categories and score vectors
//! - Time buckets produced by the window accumulator
//! - Moments, the timeline, and the analysis report
//! - VOD identifier extraction from URLs

pub mod bucket;
pub mod category;
pub mod message;
pub mod moment;
pub mod vod;

// Re-export common types
pub use bucket::{ChatBucket, MAX_SAMPLE_MESSAGES, SAMPLE_TEXT_MAX_CHARS};
pub use category::{Category, CategoryScores};
pub use message::{ChatFragment, ChatMessage, MessageScore};
pub use moment::{AnalysisReport, Moment, TimelinePoint};
pub use vod::{extract_vod_id, is_valid_vod_id, VodIdError, VodIdResult};

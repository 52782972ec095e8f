//! Chat-replay analysis core.
//!
//! Turns a stream of replay-chat messages into clip-worthy moments:
//! per-message scoring against compile-time category tables, fixed-width
//! window accumulation, composite peak detection with an adaptive threshold,
//! and the orchestrator that binds ingest to detection under a wall-clock
//! budget.

pub mod accumulator;
pub mod config;
pub mod error;
pub mod patterns;
pub mod peaks;
pub mod pipeline;
pub mod scorer;

pub use accumulator::WindowAccumulator;
pub use config::AnalysisConfig;
pub use error::{AnalysisError, AnalysisResult};
pub use peaks::detect_moments;
pub use pipeline::analyze_video;
pub use scorer::score_message;

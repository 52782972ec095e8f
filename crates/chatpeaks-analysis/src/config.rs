//! Analysis configuration.

use std::time::Duration;

/// Tunables for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Bucket width in seconds
    pub window_sec: u32,
    /// Emitted moment length in seconds
    pub clip_duration_sec: u32,
    /// Minimum padded gap between selected moments, in seconds
    pub min_gap_sec: u32,
    /// Stddev multiplier for the adaptive threshold
    pub threshold_factor: f64,
    /// Cap on emitted moments; 0 means unlimited
    pub max_highlights: usize,
    /// Page budget for the chat walk
    pub max_pages: u32,
    /// Wall-clock ceiling for one analysis
    pub analysis_timeout: Duration,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_sec: 30,
            clip_duration_sec: 30,
            min_gap_sec: 45,
            threshold_factor: 1.0,
            max_highlights: 0,
            max_pages: 15_000,
            analysis_timeout: Duration::from_secs(180),
        }
    }
}

impl AnalysisConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            window_sec: env_u32("ANALYSIS_WINDOW_SEC", defaults.window_sec),
            clip_duration_sec: env_u32("ANALYSIS_CLIP_DURATION_SEC", defaults.clip_duration_sec),
            min_gap_sec: env_u32("ANALYSIS_MIN_GAP_SEC", defaults.min_gap_sec),
            threshold_factor: std::env::var("ANALYSIS_THRESHOLD_FACTOR")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.threshold_factor),
            max_highlights: std::env::var("ANALYSIS_MAX_HIGHLIGHTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_highlights),
            max_pages: env_u32("ANALYSIS_MAX_PAGES", defaults.max_pages),
            analysis_timeout: Duration::from_millis(
                std::env::var("ANALYSIS_TIMEOUT_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.analysis_timeout.as_millis() as u64),
            ),
        }
    }

    /// Reject configurations the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.window_sec == 0 {
            return Err("window_sec must be positive".to_string());
        }
        if self.clip_duration_sec == 0 {
            return Err("clip_duration_sec must be positive".to_string());
        }
        if !(0.0..=10.0).contains(&self.threshold_factor) {
            return Err("threshold_factor must be between 0 and 10".to_string());
        }
        Ok(())
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

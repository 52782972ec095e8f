//! Chat analysis handler.

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use chatpeaks_analysis::{analyze_video, AnalysisConfig};
use chatpeaks_models::{extract_vod_id, AnalysisReport};

use crate::error::{ApiError, ApiResult};
use crate::metrics::record_analysis;
use crate::state::AppState;

/// Request to analyze a VOD's replay chat.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// VOD URL to analyze
    pub url: String,
    /// Optional per-request tuning
    #[serde(default)]
    pub options: AnalyzeOptions,
}

/// Client-tunable subset of the analysis configuration. Page budget and the
/// wall-clock ceiling stay server policy.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeOptions {
    pub window_sec: Option<u32>,
    pub clip_duration_sec: Option<u32>,
    pub min_gap_sec: Option<u32>,
    pub threshold_factor: Option<f64>,
    pub max_highlights: Option<usize>,
}

impl AnalyzeOptions {
    /// Overlay the request options on the server defaults.
    fn apply(&self, defaults: &AnalysisConfig) -> AnalysisConfig {
        AnalysisConfig {
            window_sec: self.window_sec.unwrap_or(defaults.window_sec),
            clip_duration_sec: self.clip_duration_sec.unwrap_or(defaults.clip_duration_sec),
            min_gap_sec: self.min_gap_sec.unwrap_or(defaults.min_gap_sec),
            threshold_factor: self.threshold_factor.unwrap_or(defaults.threshold_factor),
            max_highlights: self.max_highlights.unwrap_or(defaults.max_highlights),
            ..defaults.clone()
        }
    }
}

/// Analyze the replay chat of a VOD and surface clip-worthy moments.
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalysisReport>> {
    let video_id = extract_vod_id(&request.url)
        .map_err(|e| ApiError::bad_request(format!("{}: {}", e, request.url)))?;

    let config = request.options.apply(&state.analysis);
    config.validate().map_err(ApiError::bad_request)?;

    info!(video_id, "Starting chat analysis");
    let started = Instant::now();

    let result = analyze_video(state.comments.as_ref(), &video_id, &config).await;
    let duration = started.elapsed().as_secs_f64();

    match result {
        Ok(report) => {
            record_analysis("ok", duration, report.moments.len());
            info!(
                video_id,
                moments = report.moments.len(),
                total_messages = report.total_messages,
                timed_out = report.timed_out,
                "Analysis finished"
            );
            Ok(Json(report))
        }
        Err(e) => {
            record_analysis(e.code(), duration, 0);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_overlay_defaults() {
        let defaults = AnalysisConfig::default();
        let options = AnalyzeOptions {
            threshold_factor: Some(1.5),
            max_highlights: Some(5),
            ..Default::default()
        };
        let config = options.apply(&defaults);
        assert_eq!(config.threshold_factor, 1.5);
        assert_eq!(config.max_highlights, 5);
        assert_eq!(config.window_sec, defaults.window_sec);
        assert_eq!(config.max_pages, defaults.max_pages);
    }

    #[test]
    fn test_request_deserializes_without_options() {
        let request: AnalyzeRequest =
            serde_json::from_str(r#"{"url": "https://www.twitch.tv/videos/123456789"}"#).unwrap();
        assert_eq!(request.url, "https://www.twitch.tv/videos/123456789");
        assert!(request.options.window_sec.is_none());
    }
}

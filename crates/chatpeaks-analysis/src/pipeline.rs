//! Analysis orchestration.
//!
//! Binds the chat iterator to the window accumulator under a wall-clock
//! budget, then hands the completed bucket map to the peak detector and
//! shapes the final report.

use std::time::Instant;

use chrono::Utc;
use tracing::{info, warn};

use chatpeaks_chat::{iterate_chat, ChatError, CommentSource, IterateOptions};
use chatpeaks_models::{is_valid_vod_id, AnalysisReport, TimelinePoint};

use crate::accumulator::WindowAccumulator;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::peaks::detect_moments;

/// Run one full analysis for a VOD id.
///
/// Ingestion stops early when the page budget or the wall-clock ceiling is
/// hit; whatever buckets were accumulated by then still produce a report,
/// flagged `timed_out`. An upstream failure before any data arrives is an
/// error; a feed with no messages at all maps to [`AnalysisError::NoData`].
pub async fn analyze_video<S: CommentSource>(
    source: &S,
    video_id: &str,
    config: &AnalysisConfig,
) -> AnalysisResult<AnalysisReport> {
    if !is_valid_vod_id(video_id) {
        return Err(AnalysisError::invalid_input(format!(
            "'{video_id}' is not a valid VOD id"
        )));
    }
    config
        .validate()
        .map_err(AnalysisError::InvalidInput)?;

    let started = Instant::now();
    let deadline = started + config.analysis_timeout;
    let mut accumulator = WindowAccumulator::new(config.window_sec);

    let opts = IterateOptions {
        max_pages: config.max_pages,
        start_offset_seconds: 0,
    };

    let walk = iterate_chat(source, video_id, opts, |batch| {
        for msg in &batch {
            accumulator.add_message(msg);
        }
        // The deadline is checked here, between batches, so the accumulator
        // is always in a consistent state when the walk stops.
        if Instant::now() >= deadline {
            return Err(ChatError::Cancelled);
        }
        Ok(())
    })
    .await;

    let mut timed_out = false;
    match walk {
        Ok(stats) => {
            timed_out = stats.pages_processed >= config.max_pages;
            info!(
                video_id,
                pages = stats.pages_processed,
                last_offset = stats.last_offset_seconds,
                "Chat walk complete"
            );
        }
        Err(ChatError::Cancelled) => {
            timed_out = true;
            warn!(
                video_id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Analysis deadline hit, keeping partial results"
            );
        }
        Err(e) => return Err(AnalysisError::Upstream(e)),
    }

    if accumulator.bucket_count() == 0 {
        return Err(AnalysisError::NoData);
    }

    let total_messages = accumulator.total_messages();
    let buckets = accumulator.into_buckets();

    let moments = detect_moments(&buckets, config);
    let timeline: Vec<TimelinePoint> = buckets
        .iter()
        .map(|(&sec, bucket)| TimelinePoint {
            sec,
            count: bucket.message_count,
        })
        .collect();

    info!(
        video_id,
        total_messages,
        buckets = buckets.len(),
        moments = moments.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Analysis complete"
    );

    Ok(AnalysisReport {
        video_id: video_id.to_string(),
        total_messages,
        buckets_analyzed: buckets.len() as u32,
        moments,
        timeline,
        timed_out,
        analyzed_at: Utc::now(),
    })
}

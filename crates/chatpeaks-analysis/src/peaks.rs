//! Peak detection over the completed bucket map.
//!
//! Three phases: per-window composite scoring (burst, velocity, and
//! diversity on the bucket itself, volume terms widened by a virtual merge
//! with its successor), an adaptive statistical threshold, and greedy
//! non-overlapping selection shifted back by the viewer-reaction delay.

use std::collections::BTreeMap;
use std::collections::HashMap;

use tracing::debug;

use chatpeaks_models::{ChatBucket, Moment, MAX_SAMPLE_MESSAGES};

use crate::config::AnalysisConfig;

/// Backward shift applied to moment starts, compensating for the lag between
/// an on-stream event and the chat reacting to it.
pub const REACTION_DELAY_SEC: u32 = 20;

/// Burst detection: minimum messages in a window for the sliding scan to run.
const BURST_MIN_MESSAGES: usize = 10;

/// Burst detection: sliding sub-window width in seconds.
const BURST_WINDOW_SEC: u32 = 5;

/// Burst detection: minimum sustained rate (messages/sec) to register.
const BURST_MIN_RATE: f64 = 5.0;

/// Spam detection: minimum samples before repetition is measured.
const SPAM_MIN_SAMPLES: usize = 3;

/// Spam detection: repeated-share and absolute-count floors.
const SPAM_MIN_SHARE: f64 = 0.6;
const SPAM_MIN_REPEATS: usize = 3;

/// A scored window, before thresholding.
#[derive(Debug, Clone)]
struct WindowScore {
    key: u32,
    score: f64,
    burst: f64,
    merged: ChatBucket,
}

/// Produce ordered moments from the completed bucket map.
///
/// The bucket map is read-only here; an empty map yields an empty list.
pub fn detect_moments(buckets: &BTreeMap<u32, ChatBucket>, config: &AnalysisConfig) -> Vec<Moment> {
    let ordered: Vec<&ChatBucket> = buckets.values().collect();
    if ordered.is_empty() {
        return Vec::new();
    }

    // Phase 1: per-window composites
    let mut windows: Vec<WindowScore> = Vec::with_capacity(ordered.len());
    for (i, bucket) in ordered.iter().enumerate() {
        // Burst, spam, and diversity are measured on the bucket's own
        // timestamps and samples; the successor merge below only widens
        // the volume terms of the composite.
        let burst = burst_score(&bucket.message_timestamps);
        let velocity = velocity_multiplier(&ordered, i);
        let diversity = diversity_bonus(&bucket.sample_messages);

        // The repetition score rides along for diagnostics only; copypasta
        // walls are dampened through the diversity bonus instead.
        let spam = spam_score(&bucket.sample_messages);
        if spam > 0.0 {
            debug!(key = bucket.start_sec, spam, "Repetitive sample window");
        }

        let merged = merge_buckets(bucket, ordered.get(i + 1).copied());
        let raw = merged.message_count as f64
            + merged.reaction_score * 3.0
            + merged.emote_count as f64 * 2.0
            + burst * 0.5;
        let score = raw * velocity * diversity;

        windows.push(WindowScore {
            key: bucket.start_sec,
            score,
            burst,
            merged,
        });
    }

    // Phase 2: adaptive threshold (population stddev)
    let mean = windows.iter().map(|w| w.score).sum::<f64>() / windows.len() as f64;
    let variance = windows
        .iter()
        .map(|w| (w.score - mean).powi(2))
        .sum::<f64>()
        / windows.len() as f64;
    let threshold = mean + config.threshold_factor * variance.sqrt();

    let mut candidates: Vec<WindowScore> =
        windows.into_iter().filter(|w| w.score >= threshold).collect();
    debug!(
        threshold,
        candidates = candidates.len(),
        "Applied adaptive threshold"
    );

    // Phase 3: greedy non-overlapping selection, best first
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let min_gap = config.min_gap_sec as i64;
    let mut moments: Vec<Moment> = Vec::new();
    for candidate in candidates {
        let start = candidate.key.saturating_sub(REACTION_DELAY_SEC);
        let end = start + config.clip_duration_sec;

        let overlaps = moments.iter().any(|m| {
            (start as i64) < m.end_sec as i64 + min_gap && (end as i64) > m.start_sec as i64 - min_gap
        });
        if overlaps {
            continue;
        }

        let merged = candidate.merged;
        let messages_per_sec =
            (merged.message_count as f64 / config.window_sec as f64 * 10.0).round() / 10.0;

        moments.push(Moment {
            start_sec: start,
            end_sec: end,
            score: candidate.score,
            messages_per_sec,
            message_count: merged.message_count,
            tag: merged.category_scores.dominant(),
            category_scores: merged.category_scores,
            burst_score: candidate.burst,
            sample_messages: merged.sample_messages,
        });

        if config.max_highlights > 0 && moments.len() == config.max_highlights {
            break;
        }
    }

    moments.sort_by_key(|m| m.start_sec);
    moments
}

/// Virtually merge a bucket with its immediate successor.
///
/// Supplies the composite's volume terms (count, reaction, emotes) and the
/// emitted moment's category scores and samples; burst and sample statistics
/// stay per-bucket.
fn merge_buckets(bucket: &ChatBucket, next: Option<&ChatBucket>) -> ChatBucket {
    let mut merged = bucket.clone();
    if let Some(next) = next {
        merged.message_count += next.message_count;
        merged.reaction_score += next.reaction_score;
        merged.emote_count += next.emote_count;
        merged.category_scores.merge(&next.category_scores);
        for sample in &next.sample_messages {
            if merged.sample_messages.len() >= MAX_SAMPLE_MESSAGES {
                break;
            }
            merged.sample_messages.push(sample.clone());
        }
    }
    merged
}

/// Intra-window density spike score.
///
/// Finds the densest 5-second sub-window; rates below the floor score zero,
/// and above it the kernel grows superlinearly with density.
fn burst_score(timestamps: &[u32]) -> f64 {
    if timestamps.len() < BURST_MIN_MESSAGES {
        return 0.0;
    }

    let mut sorted = timestamps.to_vec();
    sorted.sort_unstable();

    let mut max_count = 0usize;
    let mut hi = 0usize;
    for lo in 0..sorted.len() {
        if hi < lo {
            hi = lo;
        }
        while hi < sorted.len() && sorted[hi] < sorted[lo] + BURST_WINDOW_SEC {
            hi += 1;
        }
        max_count = max_count.max(hi - lo);
    }

    let msgs_per_sec = max_count as f64 / BURST_WINDOW_SEC as f64;
    if msgs_per_sec < BURST_MIN_RATE {
        return 0.0;
    }

    (msgs_per_sec * (msgs_per_sec / BURST_MIN_RATE) * 10.0).round() / 10.0
}

/// Sample-repetition score: how dominated the bounded sample is by one
/// normalized line.
fn spam_score(samples: &[String]) -> f64 {
    if samples.len() < SPAM_MIN_SAMPLES {
        return 0.0;
    }

    let mut frequencies: HashMap<String, usize> = HashMap::new();
    for sample in samples {
        *frequencies
            .entry(sample.trim().to_lowercase())
            .or_default() += 1;
    }

    let max_freq = frequencies.values().copied().max().unwrap_or(0);
    if max_freq as f64 / samples.len() as f64 >= SPAM_MIN_SHARE && max_freq >= SPAM_MIN_REPEATS {
        (max_freq * 3) as f64
    } else {
        0.0
    }
}

/// Ramp-up multiplier: current bucket activity against the rolling average of
/// the up-to-two preceding buckets.
fn velocity_multiplier(ordered: &[&ChatBucket], i: usize) -> f64 {
    if i == 0 {
        return 1.0;
    }

    let lo = i.saturating_sub(2);
    let prev = &ordered[lo..i];
    let prev_avg = prev.iter().map(|b| b.message_count as f64).sum::<f64>() / prev.len() as f64;

    let count = ordered[i].message_count;
    if prev_avg < 1.0 {
        return if count > 5 { 2.0 } else { 1.0 };
    }

    let ratio = count as f64 / prev_avg;
    if ratio >= 4.0 {
        2.5
    } else if ratio >= 3.0 {
        2.0
    } else if ratio >= 2.0 {
        1.5
    } else if ratio >= 1.5 {
        1.2
    } else {
        1.0
    }
}

/// Bonus in [0.5, 1.0] rewarding varied chatter over copypasta walls.
fn diversity_bonus(samples: &[String]) -> f64 {
    let unique_ratio = if samples.len() < 2 {
        1.0
    } else {
        let distinct: std::collections::HashSet<String> = samples
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect();
        distinct.len() as f64 / samples.len() as f64
    };
    0.5 + unique_ratio * 0.5
}

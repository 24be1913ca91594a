//! Confidence scoring.
//!
//! Confidence estimates how much trust an analytics snapshot deserves,
//! from data volume (per-category counts against configured targets) and
//! recency (a bonus when the newest record is fresh).

use crate::config::ConfidenceConfig;
use lumen_core::{CategoryCounts, Timestamp};
use std::time::Duration;

/// Compute the confidence score in [0, 1], rounded to 2 decimal places.
///
/// Each category contributes `min(count / target, 1) * weight`; a newest
/// record younger than the recency window adds the configured bonus. The
/// result is clamped so the bonus can never push past 1.
pub fn score(
    counts: &CategoryCounts,
    newest: Option<Timestamp>,
    now: Timestamp,
    config: &ConfidenceConfig,
) -> f64 {
    let base = saturation(counts.emotion, config.emotion_target) * config.emotion_weight
        + saturation(counts.sensory, config.sensory_target) * config.sensory_weight
        + saturation(counts.tracking, config.tracking_target) * config.tracking_weight;

    let mut value = base;
    if let Some(newest) = newest {
        let age = now
            .signed_duration_since(newest)
            .to_std()
            .unwrap_or(Duration::ZERO);
        if age < config.recency_window {
            value += config.recency_bonus;
        }
    }

    (value.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

fn saturation(count: u32, target: u32) -> f64 {
    if target == 0 {
        return 1.0;
    }
    (count as f64 / target as f64).min(1.0)
}

//! Insight generation.
//!
//! Turns raw findings into the ordered, human-readable insight lines of a
//! snapshot. The ordering is fixed: guidance about data volume first, then
//! high-confidence patterns (strongest first), high-significance
//! correlations, predictions, a recent positive-rate line, and finally a
//! generic fallback when nothing else applied.

use crate::config::InsightConfig;
use lumen_core::{
    CorrelationFinding, ObservationRecord, PatternFinding, PredictionFinding, Significance,
    Valence,
};
use std::cmp::Ordering;

/// Guidance line for a subject with no records at all.
pub const NO_DATA_INSIGHT: &str =
    "Start logging daily observations to unlock personalized insights.";

/// Fallback line when no other insight applied.
pub const MONITORING_INSIGHT: &str =
    "Monitoring active. New insights will appear as more data accumulates.";

/// Generate the ordered insight lines for one analysis pass.
pub fn generate(
    records: &[ObservationRecord],
    patterns: &[PatternFinding],
    correlations: &[CorrelationFinding],
    predictions: &[PredictionFinding],
    config: &InsightConfig,
) -> Vec<String> {
    if records.is_empty() {
        return vec![NO_DATA_INSIGHT.to_string()];
    }

    let mut insights = Vec::new();

    if (records.len() as u32) < config.full_analytics_threshold {
        insights.push(format!(
            "Log {} more sessions to unlock full analytics.",
            config.full_analytics_threshold - records.len() as u32
        ));
    }

    let mut strong: Vec<&PatternFinding> = patterns
        .iter()
        .filter(|p| p.confidence > config.high_confidence_threshold)
        .collect();
    strong.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });
    for pattern in strong.into_iter().take(config.max_patterns) {
        insights.push(format!(
            "{} ({}% confidence)",
            pattern.description,
            percent(pattern.confidence)
        ));
    }

    for correlation in correlations
        .iter()
        .filter(|c| c.significance == Significance::High)
        .take(config.max_correlations)
    {
        insights.push(correlation.description.clone());
    }

    for prediction in predictions.iter().take(config.max_predictions) {
        insights.push(format!(
            "{} ({}% confidence)",
            prediction.description,
            percent(prediction.confidence)
        ));
    }

    if records.len() >= config.positive_window {
        let window = &records[records.len() - config.positive_window..];
        if let Some(rate) = positive_rate(window) {
            if rate > config.positive_upper {
                insights.push(format!(
                    "Positive momentum: {}% of recent observations were positive. Keep it up.",
                    percent(rate)
                ));
            } else if rate < config.positive_lower {
                insights.push(format!(
                    "Heads up: only {}% of recent observations were positive. \
                     Consider reviewing recent changes.",
                    percent(rate)
                ));
            }
        }
    }

    if insights.is_empty() {
        insights.push(MONITORING_INSIGHT.to_string());
    }
    insights
}

/// Share of positive observations among the window's valenced records.
/// None when no record in the window carries a valence.
fn positive_rate(window: &[ObservationRecord]) -> Option<f64> {
    let valenced: Vec<Valence> = window.iter().filter_map(|r| r.valence).collect();
    if valenced.is_empty() {
        return None;
    }
    let positive = valenced.iter().filter(|&&v| v == Valence::Positive).count();
    Some(positive as f64 / valenced.len() as f64)
}

fn percent(fraction: f64) -> u32 {
    (fraction * 100.0).round() as u32
}

//! Health scoring.
//!
//! The health score is a [0, 100] composite summarizing how complete and
//! trustworthy a subject's analytics currently are: present signals earn
//! raw points, which are then discounted by the snapshot's confidence.

use crate::config::HealthConfig;
use lumen_core::AnalyticsSnapshot;

/// Compute the health score for a snapshot.
///
/// Each of the four non-empty finding lists and `has_minimum_data`
/// contributes `signal_weight` raw points (capped at 100); the raw total is
/// multiplied by the snapshot's confidence and rounded to the nearest
/// integer.
pub fn score(snapshot: &AnalyticsSnapshot, config: &HealthConfig) -> u8 {
    let mut signals = snapshot.signal_count();
    if snapshot.has_minimum_data {
        signals += 1;
    }
    let raw = (signals * config.signal_weight as u32).min(100) as f64;
    let scaled = (raw * snapshot.confidence).round();
    scaled.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lumen_core::{
        AnomalyFinding, CorrelationFinding, PatternFinding, PredictionFinding, Significance,
    };

    fn full_snapshot(confidence: f64) -> AnalyticsSnapshot {
        let mut snapshot = AnalyticsSnapshot::empty(Utc::now());
        snapshot.patterns.push(PatternFinding {
            description: "p".to_string(),
            confidence: 0.9,
        });
        snapshot.correlations.push(CorrelationFinding {
            description: "c".to_string(),
            significance: Significance::High,
        });
        snapshot.predictions.push(PredictionFinding {
            description: "f".to_string(),
            confidence: 0.8,
        });
        snapshot.anomalies.push(AnomalyFinding {
            description: "a".to_string(),
            detail: serde_json::Value::Null,
        });
        snapshot.has_minimum_data = true;
        snapshot.confidence = confidence;
        snapshot
    }

    #[test]
    fn test_empty_snapshot_scores_zero() {
        let snapshot = AnalyticsSnapshot::empty(Utc::now());
        assert_eq!(score(&snapshot, &HealthConfig::default()), 0);
    }

    #[test]
    fn test_full_snapshot_at_full_confidence_is_exactly_100() {
        assert_eq!(score(&full_snapshot(1.0), &HealthConfig::default()), 100);
    }

    #[test]
    fn test_confidence_discounts_raw_points() {
        assert_eq!(score(&full_snapshot(0.5), &HealthConfig::default()), 50);
        assert_eq!(score(&full_snapshot(0.75), &HealthConfig::default()), 75);
    }

    #[test]
    fn test_partial_signals() {
        let mut snapshot = AnalyticsSnapshot::empty(Utc::now());
        snapshot.has_minimum_data = true;
        snapshot.confidence = 1.0;
        // Minimum data alone: one signal.
        assert_eq!(score(&snapshot, &HealthConfig::default()), 20);
    }

    #[test]
    fn test_raw_points_capped_at_100() {
        let config = HealthConfig { signal_weight: 40 };
        // Five signals at weight 40 would be 200 raw; the cap holds the
        // result at 100.
        assert_eq!(score(&full_snapshot(1.0), &config), 100);
    }
}

//! Analytics snapshot types.
//!
//! An [`AnalyticsSnapshot`] is the immutable output of one orchestrated
//! analysis pass. Snapshots are replaced wholesale on refresh, never patched
//! in place.

use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Statistical significance of a correlation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    Low,
    Medium,
    High,
}

/// A recurring pattern reported by the pattern analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternFinding {
    pub description: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

/// A correlation reported by the correlation analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationFinding {
    pub description: String,
    pub significance: Significance,
}

/// A forward-looking finding reported by the predictive analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionFinding {
    pub description: String,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

/// An anomaly reported by the anomaly detector.
///
/// The detail payload is opaque to the orchestrator; it is carried through
/// for downstream consumers without interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFinding {
    pub description: String,
    #[serde(default)]
    pub detail: serde_json::Value,
}

/// The aggregate result of one analysis pass for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub patterns: Vec<PatternFinding>,
    pub correlations: Vec<CorrelationFinding>,
    pub predictions: Vec<PredictionFinding>,
    pub anomalies: Vec<AnomalyFinding>,
    /// Ranked human-readable insight lines, highest priority first.
    pub insights: Vec<String>,
    /// Whether the subject had at least one record in at least one tracked
    /// category when the snapshot was computed.
    pub has_minimum_data: bool,
    /// Trust estimate in [0, 1], derived from data volume and recency.
    pub confidence: f64,
    pub generated_at: Timestamp,
}

impl AnalyticsSnapshot {
    /// An empty snapshot for a subject with no usable data.
    pub fn empty(generated_at: Timestamp) -> Self {
        Self {
            patterns: Vec::new(),
            correlations: Vec::new(),
            predictions: Vec::new(),
            anomalies: Vec::new(),
            insights: Vec::new(),
            has_minimum_data: false,
            confidence: 0.0,
            generated_at,
        }
    }

    /// Number of non-empty signal lists (patterns, correlations,
    /// predictions, anomalies).
    pub fn signal_count(&self) -> u32 {
        [
            !self.patterns.is_empty(),
            !self.correlations.is_empty(),
            !self.predictions.is_empty(),
            !self.anomalies.is_empty(),
        ]
        .iter()
        .filter(|&&present| present)
        .count() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = AnalyticsSnapshot::empty(Utc::now());
        assert!(!snapshot.has_minimum_data);
        assert_eq!(snapshot.confidence, 0.0);
        assert_eq!(snapshot.signal_count(), 0);
        assert!(snapshot.insights.is_empty());
    }

    #[test]
    fn test_signal_count() {
        let mut snapshot = AnalyticsSnapshot::empty(Utc::now());
        snapshot.patterns.push(PatternFinding {
            description: "evening spikes".to_string(),
            confidence: 0.8,
        });
        snapshot.anomalies.push(AnomalyFinding {
            description: "outlier on tuesday".to_string(),
            detail: serde_json::Value::Null,
        });
        assert_eq!(snapshot.signal_count(), 2);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let snapshot = AnalyticsSnapshot {
            patterns: vec![PatternFinding {
                description: "p".to_string(),
                confidence: 0.5,
            }],
            correlations: vec![CorrelationFinding {
                description: "c".to_string(),
                significance: Significance::High,
            }],
            predictions: vec![],
            anomalies: vec![],
            insights: vec!["line".to_string()],
            has_minimum_data: true,
            confidence: 0.75,
            generated_at: Utc::now(),
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: AnalyticsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}

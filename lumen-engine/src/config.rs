//! Engine configuration.
//!
//! Every tunable in the confidence, health, and insight computations lives
//! here. `EngineConfig::validate` is called by the engine constructor, so a
//! misconfigured engine fails loudly at startup instead of producing skewed
//! scores at runtime.

use lumen_cache::CacheConfig;
use lumen_core::{ConfigError, LumenError, LumenResult};
use std::time::Duration;

/// Tunables for the confidence formula.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceConfig {
    /// Record-count targets per category; reaching a target saturates that
    /// category's contribution.
    pub emotion_target: u32,
    pub sensory_target: u32,
    pub tracking_target: u32,
    /// Per-category weights. Must sum to 1.
    pub emotion_weight: f64,
    pub sensory_weight: f64,
    pub tracking_weight: f64,
    /// A newest record younger than this window earns the recency bonus.
    pub recency_window: Duration,
    pub recency_bonus: f64,
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            emotion_target: 10,
            sensory_target: 10,
            tracking_target: 10,
            emotion_weight: 0.4,
            sensory_weight: 0.3,
            tracking_weight: 0.3,
            recency_window: Duration::from_secs(7 * 24 * 3600),
            recency_bonus: 0.1,
        }
    }
}

/// Tunables for the health score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthConfig {
    /// Points awarded per present signal (each non-empty finding list, plus
    /// minimum data). Five signals at the default weight reach the raw
    /// ceiling of 100.
    pub signal_weight: u8,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self { signal_weight: 20 }
    }
}

/// Tunables for insight generation.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightConfig {
    pub max_patterns: usize,
    pub max_correlations: usize,
    pub max_predictions: usize,
    /// Only patterns above this confidence become insight lines.
    pub high_confidence_threshold: f64,
    /// Below this total record count, a data-volume guidance line is
    /// prepended.
    pub full_analytics_threshold: u32,
    /// Number of most recent records the positive-rate check looks at.
    pub positive_window: usize,
    /// Positive-rate above this appends the encouraging line.
    pub positive_upper: f64,
    /// Positive-rate below this appends the cautionary line.
    pub positive_lower: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            max_patterns: 3,
            max_correlations: 2,
            max_predictions: 2,
            high_confidence_threshold: 0.6,
            full_analytics_threshold: 10,
            positive_window: 7,
            positive_upper: 0.7,
            positive_lower: 0.3,
        }
    }
}

/// Master engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub cache: CacheConfig,
    pub confidence: ConfidenceConfig,
    pub health: HealthConfig,
    pub insights: InsightConfig,
    /// Look-back window handed to the pattern analyzer, in days.
    pub analysis_window_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            confidence: ConfidenceConfig::default(),
            health: HealthConfig::default(),
            insights: InsightConfig::default(),
            analysis_window_days: 30,
        }
    }
}

impl EngineConfig {
    /// Validate the configuration.
    /// Returns Ok(()) if valid, Err(LumenError::Config) if invalid.
    pub fn validate(&self) -> LumenResult<()> {
        if self.cache.max_entries == 0 {
            return Err(invalid(
                "cache.max_entries",
                self.cache.max_entries.to_string(),
                "must be greater than 0",
            ));
        }

        for (field, target) in [
            ("confidence.emotion_target", self.confidence.emotion_target),
            ("confidence.sensory_target", self.confidence.sensory_target),
            (
                "confidence.tracking_target",
                self.confidence.tracking_target,
            ),
        ] {
            if target == 0 {
                return Err(invalid(field, target.to_string(), "must be greater than 0"));
            }
        }

        for (field, weight) in [
            ("confidence.emotion_weight", self.confidence.emotion_weight),
            ("confidence.sensory_weight", self.confidence.sensory_weight),
            (
                "confidence.tracking_weight",
                self.confidence.tracking_weight,
            ),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(invalid(field, weight.to_string(), "must be in [0, 1]"));
            }
        }
        let weight_sum = self.confidence.emotion_weight
            + self.confidence.sensory_weight
            + self.confidence.tracking_weight;
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(invalid(
                "confidence.*_weight",
                weight_sum.to_string(),
                "weights must sum to 1",
            ));
        }

        if self.confidence.recency_bonus < 0.0 {
            return Err(invalid(
                "confidence.recency_bonus",
                self.confidence.recency_bonus.to_string(),
                "must be non-negative",
            ));
        }

        if self.health.signal_weight == 0 {
            return Err(invalid(
                "health.signal_weight",
                self.health.signal_weight.to_string(),
                "must be greater than 0",
            ));
        }

        if !(0.0..=1.0).contains(&self.insights.high_confidence_threshold) {
            return Err(invalid(
                "insights.high_confidence_threshold",
                self.insights.high_confidence_threshold.to_string(),
                "must be in [0, 1]",
            ));
        }
        if self.insights.positive_window == 0 {
            return Err(invalid(
                "insights.positive_window",
                self.insights.positive_window.to_string(),
                "must be greater than 0",
            ));
        }
        for (field, rate) in [
            ("insights.positive_upper", self.insights.positive_upper),
            ("insights.positive_lower", self.insights.positive_lower),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(invalid(field, rate.to_string(), "must be in [0, 1]"));
            }
        }
        if self.insights.positive_lower > self.insights.positive_upper {
            return Err(invalid(
                "insights.positive_lower",
                self.insights.positive_lower.to_string(),
                "must not exceed insights.positive_upper",
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, value: String, reason: &str) -> LumenError {
    LumenError::Config(ConfigError::InvalidValue {
        field: field.to_string(),
        value,
        reason: reason.to_string(),
    })
}

//! Analytics profile types and persisted-record validation.

use lumen_core::{Timestamp, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which analysis families are enabled for a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub patterns: bool,
    pub correlations: bool,
    pub predictions: bool,
    pub anomalies: bool,
    pub alerting: bool,
}

impl Default for FeatureFlags {
    /// Everything enabled.
    fn default() -> Self {
        Self {
            patterns: true,
            correlations: true,
            predictions: true,
            anomalies: true,
            alerting: true,
        }
    }
}

/// Minimum record counts per category for full-strength analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumData {
    pub emotion: u32,
    pub sensory: u32,
    pub tracking: u32,
}

impl Default for MinimumData {
    /// At least one record of each observed category.
    fn default() -> Self {
        Self {
            emotion: 1,
            sensory: 1,
            tracking: 1,
        }
    }
}

/// Per-subject analysis lifecycle state.
///
/// Created on first initialization, mutated only by the orchestrator after
/// a completed analysis, never deleted in normal operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsProfile {
    pub subject_id: String,
    pub is_initialized: bool,
    /// When the orchestrator last completed an analysis for this subject.
    /// Serialized as an ISO-8601 string.
    #[serde(default)]
    pub last_analyzed_at: Option<Timestamp>,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub minimum_data: MinimumData,
    /// Composite health score in [0, 100].
    #[serde(default)]
    pub health_score: u8,
}

impl AnalyticsProfile {
    /// A freshly initialized profile: all features on, default minimum-data
    /// requirements, never analyzed.
    pub fn initialized(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            is_initialized: true,
            last_analyzed_at: None,
            features: FeatureFlags::default(),
            minimum_data: MinimumData::default(),
            health_score: 0,
        }
    }
}

/// Partial update merged into an existing profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub last_analyzed_at: Option<Timestamp>,
    pub health_score: Option<u8>,
}

/// Schema-validate one persisted profile record.
///
/// Explicit checks first (so a malformed record produces a diagnosable
/// error instead of an opaque deserialization failure), then the serde
/// round-trip. Records failing validation are skipped by the store's
/// loader; they are never fatal.
pub fn validate_profile(value: &Value) -> Result<AnalyticsProfile, ValidationError> {
    let subject_id = match value.get("subject_id") {
        None => {
            return Err(ValidationError::RequiredFieldMissing {
                field: "subject_id".to_string(),
            })
        }
        Some(v) => v.as_str().ok_or_else(|| ValidationError::InvalidValue {
            field: "subject_id".to_string(),
            reason: "must be a string".to_string(),
        })?,
    };
    if subject_id.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "subject_id".to_string(),
            reason: "must be non-empty".to_string(),
        });
    }

    match value.get("is_initialized") {
        None => {
            return Err(ValidationError::RequiredFieldMissing {
                field: "is_initialized".to_string(),
            })
        }
        Some(v) if !v.is_boolean() => {
            return Err(ValidationError::InvalidValue {
                field: "is_initialized".to_string(),
                reason: "must be a boolean".to_string(),
            })
        }
        Some(_) => {}
    }

    serde_json::from_value(value.clone()).map_err(|e| ValidationError::InvalidValue {
        field: "profile".to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn test_initialized_profile_defaults() {
        let profile = AnalyticsProfile::initialized("subj-1");
        assert!(profile.is_initialized);
        assert!(profile.features.patterns && profile.features.alerting);
        assert_eq!(profile.minimum_data, MinimumData::default());
        assert_eq!(profile.health_score, 0);
        assert!(profile.last_analyzed_at.is_none());
    }

    #[test]
    fn test_timestamp_serializes_as_iso8601() {
        let mut profile = AnalyticsProfile::initialized("subj-1");
        profile.last_analyzed_at = Some(Utc.with_ymd_and_hms(2025, 3, 9, 12, 30, 0).unwrap());
        let json = serde_json::to_value(&profile).unwrap();
        let raw = json["last_analyzed_at"].as_str().unwrap();
        assert!(raw.starts_with("2025-03-09T12:30:00"));

        let back: AnalyticsProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_validate_accepts_minimal_record() {
        let profile = validate_profile(&json!({
            "subject_id": "s1",
            "is_initialized": true,
        }))
        .unwrap();
        assert_eq!(profile.subject_id, "s1");
        assert_eq!(profile.features, FeatureFlags::default());
    }

    #[test]
    fn test_validate_rejects_missing_subject_id() {
        let err = validate_profile(&json!({"is_initialized": true})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::RequiredFieldMissing {
                field: "subject_id".to_string()
            }
        );
    }

    #[test]
    fn test_validate_rejects_empty_subject_id() {
        let err =
            validate_profile(&json!({"subject_id": "", "is_initialized": true})).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { .. }));
    }

    #[test]
    fn test_validate_rejects_non_boolean_initialized() {
        let err =
            validate_profile(&json!({"subject_id": "s1", "is_initialized": "yes"})).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidValue { ref field, .. } if field == "is_initialized"
        ));
    }
}

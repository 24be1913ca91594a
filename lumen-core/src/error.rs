//! Error types for LUMEN operations
//!
//! All enums derive `Clone`: in-flight analysis futures are shared between
//! concurrent callers, so their error arm must be cloneable.

use thiserror::Error;

/// Record store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("Subject not found: {subject_id}")]
    SubjectNotFound { subject_id: String },

    #[error("Record store unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Analyzer invocation errors.
///
/// These never propagate out of the orchestrator; a failing analyzer
/// contributes an empty list and the overall analysis still succeeds.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnalyzerError {
    #[error("Analyzer {analyzer} failed: {reason}")]
    Failed { analyzer: String, reason: String },
}

/// Profile persistence errors.
///
/// Caught and logged by the profile store; in-memory state remains
/// authoritative for the running process.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Persistence backend failed on {operation}: {reason}")]
    Backend { operation: String, reason: String },

    #[error("Profile serialization failed: {reason}")]
    Serialization { reason: String },
}

/// Schema validation errors for persisted records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredFieldMissing { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for all LUMEN errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LumenError {
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Analyzer error: {0}")]
    Analyzer(#[from] AnalyzerError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl LumenError {
    /// Whether this error is a missing-subject condition, the only error a
    /// caller of the analytics API is expected to handle.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LumenError::Data(DataError::SubjectNotFound { .. }))
    }
}

/// Result type alias for LUMEN operations.
pub type LumenResult<T> = Result<T, LumenError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_display_not_found() {
        let err = DataError::SubjectNotFound {
            subject_id: "subj-9".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Subject not found"));
        assert!(msg.contains("subj-9"));
    }

    #[test]
    fn test_analyzer_error_display() {
        let err = AnalyzerError::Failed {
            analyzer: "pattern".to_string(),
            reason: "window too short".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("pattern"));
        assert!(msg.contains("window too short"));
    }

    #[test]
    fn test_store_error_display_backend() {
        let err = StoreError::Backend {
            operation: "save".to_string(),
            reason: "disk full".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("save"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::InvalidValue {
            field: "is_initialized".to_string(),
            reason: "must be boolean".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("is_initialized"));
        assert!(msg.contains("must be boolean"));
    }

    #[test]
    fn test_lumen_error_from_variants() {
        let data = LumenError::from(DataError::Unavailable {
            reason: "timeout".to_string(),
        });
        assert!(matches!(data, LumenError::Data(_)));

        let analyzer = LumenError::from(AnalyzerError::Failed {
            analyzer: "anomaly".to_string(),
            reason: "panic".to_string(),
        });
        assert!(matches!(analyzer, LumenError::Analyzer(_)));

        let store = LumenError::from(StoreError::Serialization {
            reason: "bad json".to_string(),
        });
        assert!(matches!(store, LumenError::Store(_)));

        let config = LumenError::from(ConfigError::InvalidValue {
            field: "recency_bonus".to_string(),
            value: "-1".to_string(),
            reason: "must be non-negative".to_string(),
        });
        assert!(matches!(config, LumenError::Config(_)));
    }

    #[test]
    fn test_is_not_found() {
        let not_found = LumenError::from(DataError::SubjectNotFound {
            subject_id: "x".to_string(),
        });
        assert!(not_found.is_not_found());

        let other = LumenError::from(DataError::Unavailable {
            reason: "down".to_string(),
        });
        assert!(!other.is_not_found());
    }
}

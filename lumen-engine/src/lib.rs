//! LUMEN Engine - Analytics Orchestration
//!
//! The orchestrator behind the public analytics API. For each subject it
//! coordinates the record store and the pluggable analyzers, derives
//! confidence/health metrics and ranked insight strings, caches the
//! resulting snapshot, and maintains the subject's analysis profile.
//!
//! The engine is an explicitly constructed service instance: build one at
//! process start with [`AnalyticsEngine::new`] and pass it by reference to
//! consumers. There is no hidden global state, which also makes substituting
//! fake collaborators in tests trivial.
//!
//! Failure policy: everything is fail-soft except a missing subject. A
//! failing analyzer contributes an empty list, a failing persistence backend
//! is logged and ignored, and bulk refreshes aggregate per-subject failures
//! instead of aborting. Only [`DataError::SubjectNotFound`] propagates to
//! callers.
//!
//! [`DataError::SubjectNotFound`]: lumen_core::DataError::SubjectNotFound

pub mod config;
pub mod confidence;
pub mod engine;
pub mod health;
pub mod insight;
pub mod traits;

pub use config::{ConfidenceConfig, EngineConfig, HealthConfig, InsightConfig};
pub use engine::{AnalyticsEngine, RefreshOutcome, SubjectStatus};
pub use traits::{
    AnalyzerSet, AnomalyDetector, CorrelationAnalyzer, DataSeeder, PatternAnalyzer,
    PredictiveAnalyzer, RecordStore,
};

//! Collaborator contracts consumed by the orchestrator.
//!
//! Implementations live outside this crate. The engine only depends on
//! these seams, which is also what makes it testable with scripted fakes.

use async_trait::async_trait;
use lumen_core::{
    AnalyzerError, AnomalyFinding, CorrelationFinding, LumenResult, ObservationRecord,
    PatternFinding, PredictionFinding, SubjectRef,
};
use std::sync::Arc;

/// Read access to the external datastore of subjects and their records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List all known subjects.
    async fn subjects(&self) -> LumenResult<Vec<SubjectRef>>;

    /// All records for a subject, ordered by timestamp ascending.
    ///
    /// Must fail with [`DataError::SubjectNotFound`] only when the subject
    /// id itself is unknown - never when it merely has zero records.
    ///
    /// [`DataError::SubjectNotFound`]: lumen_core::DataError::SubjectNotFound
    async fn records_for(&self, subject_id: &str) -> LumenResult<Vec<ObservationRecord>>;

    /// Active goal descriptions for a subject, fed to the predictive
    /// analyzer. Stores without a goal concept keep the default.
    async fn goals_for(&self, _subject_id: &str) -> LumenResult<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Detects recurring patterns over a look-back window.
#[async_trait]
pub trait PatternAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        records: &[ObservationRecord],
        window_days: u32,
    ) -> Result<Vec<PatternFinding>, AnalyzerError>;
}

/// Detects cross-category correlations.
#[async_trait]
pub trait CorrelationAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        records: &[ObservationRecord],
    ) -> Result<Vec<CorrelationFinding>, AnalyzerError>;
}

/// Produces forward-looking findings against the subject's goals.
#[async_trait]
pub trait PredictiveAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        records: &[ObservationRecord],
        goals: &[String],
    ) -> Result<Vec<PredictionFinding>, AnalyzerError>;
}

/// Flags outliers in the record stream.
#[async_trait]
pub trait AnomalyDetector: Send + Sync {
    async fn detect(
        &self,
        records: &[ObservationRecord],
    ) -> Result<Vec<AnomalyFinding>, AnalyzerError>;
}

/// Bootstrap collaborator that populates an empty record store with seed
/// data. Invoked by the embedding application when it decides bootstrapping
/// is appropriate; the engine itself never calls it.
#[async_trait]
pub trait DataSeeder: Send + Sync {
    /// Seed the datastore. Returns the number of records written.
    async fn seed(&self) -> LumenResult<u64>;
}

/// The full set of analyzers the engine fans out to.
#[derive(Clone)]
pub struct AnalyzerSet {
    pub patterns: Arc<dyn PatternAnalyzer>,
    pub correlations: Arc<dyn CorrelationAnalyzer>,
    pub predictions: Arc<dyn PredictiveAnalyzer>,
    pub anomalies: Arc<dyn AnomalyDetector>,
}

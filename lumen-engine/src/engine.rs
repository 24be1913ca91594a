//! The analytics orchestration service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::{join_all, BoxFuture, Shared};
use futures_util::FutureExt;
use lumen_cache::{CacheStats, TaggedCache};
use lumen_core::{
    AnalyticsSnapshot, CategoryCounts, Clock, LumenResult, SubjectRef, SystemClock, Timestamp,
};
use lumen_store::{ProfileBackend, ProfileStore, ProfileUpdate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::traits::{AnalyzerSet, RecordStore};
use crate::{confidence, health, insight};

/// A computation shared between concurrent callers for the same subject.
type PendingAnalysis = Shared<BoxFuture<'static, LumenResult<AnalyticsSnapshot>>>;

/// One row of the status summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectStatus {
    pub id: String,
    pub name: String,
    pub initialized: bool,
    pub last_analyzed_at: Option<Timestamp>,
    pub health_score: u8,
    pub has_minimum_data: bool,
}

/// Aggregate result of a bulk refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RefreshOutcome {
    pub refreshed: usize,
    pub failed: usize,
}

/// Orchestrates analysis passes per subject.
///
/// Owns its snapshot cache and profile store exclusively; collaborators are
/// injected as trait objects. Concurrent [`analytics`](Self::analytics)
/// calls for the same subject share one in-flight computation instead of
/// invoking the analyzers twice.
pub struct AnalyticsEngine {
    records: Arc<dyn RecordStore>,
    analyzers: AnalyzerSet,
    cache: Arc<TaggedCache<AnalyticsSnapshot>>,
    profiles: Arc<ProfileStore>,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    in_flight: Mutex<HashMap<String, PendingAnalysis>>,
}

impl AnalyticsEngine {
    /// Create an engine with the system clock.
    ///
    /// Fails if the configuration is invalid.
    pub fn new(
        records: Arc<dyn RecordStore>,
        analyzers: AnalyzerSet,
        backend: Arc<dyn ProfileBackend>,
        config: EngineConfig,
    ) -> LumenResult<Self> {
        Self::with_clock(records, analyzers, backend, config, Arc::new(SystemClock))
    }

    /// Create an engine with an injected clock.
    pub fn with_clock(
        records: Arc<dyn RecordStore>,
        analyzers: AnalyzerSet,
        backend: Arc<dyn ProfileBackend>,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> LumenResult<Self> {
        config.validate()?;
        let cache = Arc::new(TaggedCache::with_clock(
            config.cache.clone(),
            Arc::clone(&clock),
        ));
        let profiles = Arc::new(ProfileStore::new(backend));
        Ok(Self {
            records,
            analyzers,
            cache,
            profiles,
            config,
            clock,
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    /// Load persisted profiles. Typically called once at startup.
    pub async fn load_profiles(&self) {
        self.profiles.load().await;
    }

    /// Ensure a profile exists for `subject_id`. Idempotent.
    pub async fn initialize(&self, subject_id: &str) {
        self.profiles.initialize(subject_id).await;
    }

    /// Snapshot of one subject's profile.
    pub fn profile(&self, subject_id: &str) -> Option<lumen_store::AnalyticsProfile> {
        self.profiles.get(subject_id)
    }

    /// Get (or compute) the analytics snapshot for a subject.
    ///
    /// Serves from the cache when fresh; otherwise runs one full analysis
    /// pass, caches the snapshot, and updates the subject's profile. The
    /// only error that propagates is a missing subject.
    pub async fn analytics(&self, subject_id: &str) -> LumenResult<AnalyticsSnapshot> {
        self.profiles.initialize(subject_id).await;

        if let Some(snapshot) = self.cache.get(subject_id) {
            debug!(subject_id, "analytics served from cache");
            return Ok(snapshot);
        }

        let pending = self.join_in_flight(subject_id);
        let result = pending.await;
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(subject_id);
        result
    }

    /// Drop any cached snapshot for `subject_id` and recompute: exactly one
    /// fresh analyzer pass.
    pub async fn refresh(&self, subject_id: &str) -> LumenResult<AnalyticsSnapshot> {
        self.cache.remove(subject_id);
        self.analytics(subject_id).await
    }

    /// Refresh every known subject concurrently, all-settled: a failing
    /// subject is logged and counted, never aborts the batch.
    pub async fn refresh_all(&self) -> LumenResult<RefreshOutcome> {
        let subjects = self.records.subjects().await?;
        let results = join_all(subjects.into_iter().map(|subject| async move {
            self.profiles.initialize(&subject.id).await;
            match self.refresh(&subject.id).await {
                Ok(_) => true,
                Err(e) => {
                    warn!(subject_id = %subject.id, error = %e, "bulk refresh failed for subject");
                    false
                }
            }
        }))
        .await;

        let refreshed = results.iter().filter(|&&ok| ok).count();
        Ok(RefreshOutcome {
            refreshed,
            failed: results.len() - refreshed,
        })
    }

    /// Join the subject directory against profiles and record availability.
    pub async fn status_summary(&self) -> LumenResult<Vec<SubjectStatus>> {
        let subjects = self.records.subjects().await?;
        let mut statuses = Vec::with_capacity(subjects.len());
        for SubjectRef { id, name } in subjects {
            let profile = self.profiles.get(&id);
            let has_minimum_data = match self.records.records_for(&id).await {
                Ok(records) => !records.is_empty(),
                Err(e) => {
                    warn!(subject_id = %id, error = %e, "record lookup failed in status summary");
                    false
                }
            };
            statuses.push(SubjectStatus {
                initialized: profile.as_ref().map(|p| p.is_initialized).unwrap_or(false),
                last_analyzed_at: profile.as_ref().and_then(|p| p.last_analyzed_at),
                health_score: profile.map(|p| p.health_score).unwrap_or(0),
                has_minimum_data,
                id,
                name,
            });
        }
        Ok(statuses)
    }

    /// Invalidate cached snapshots: one subject's, or every subject's via a
    /// version bump (O(1), entries fall out lazily).
    pub fn clear_cache(&self, subject_id: Option<&str>) {
        match subject_id {
            Some(id) => {
                self.cache.remove(id);
            }
            None => self.cache.invalidate_version(),
        }
    }

    /// Snapshot-cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Sweep stale snapshot-cache entries. Returns the number removed.
    pub fn cleanup_cache(&self) -> usize {
        self.cache.cleanup()
    }

    /// Attach to the pending computation for `subject_id`, starting one if
    /// none is in flight. The lock is released before any await.
    fn join_in_flight(&self, subject_id: &str) -> PendingAnalysis {
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(pending) = in_flight.get(subject_id) {
            debug!(subject_id, "joining in-flight analysis");
            return pending.clone();
        }
        let pending = Self::compute(
            subject_id.to_string(),
            Arc::clone(&self.records),
            self.analyzers.clone(),
            Arc::clone(&self.cache),
            Arc::clone(&self.profiles),
            self.config.clone(),
            Arc::clone(&self.clock),
        )
        .boxed()
        .shared();
        in_flight.insert(subject_id.to_string(), pending.clone());
        pending
    }

    /// One full analysis pass. Owns clones of every collaborator so the
    /// future is `'static` and can be shared between callers.
    async fn compute(
        subject_id: String,
        store: Arc<dyn RecordStore>,
        analyzers: AnalyzerSet,
        cache: Arc<TaggedCache<AnalyticsSnapshot>>,
        profiles: Arc<ProfileStore>,
        config: EngineConfig,
        clock: Arc<dyn Clock>,
    ) -> LumenResult<AnalyticsSnapshot> {
        let records = store.records_for(&subject_id).await?;
        let has_minimum_data = !records.is_empty();
        let features = profiles
            .get(&subject_id)
            .map(|p| p.features)
            .unwrap_or_default();

        let (patterns, correlations, predictions, anomalies) = if has_minimum_data {
            let goals = match store.goals_for(&subject_id).await {
                Ok(goals) => goals,
                Err(e) => {
                    warn!(subject_id = %subject_id, error = %e, "goal lookup failed");
                    Vec::new()
                }
            };

            // Fan out, each analyzer independently fail-soft: one failure
            // contributes an empty list while the others still run.
            let pattern_task = async {
                if !features.patterns {
                    return Vec::new();
                }
                match analyzers
                    .patterns
                    .analyze(&records, config.analysis_window_days)
                    .await
                {
                    Ok(findings) => findings,
                    Err(e) => {
                        warn!(subject_id = %subject_id, error = %e, "pattern analyzer failed");
                        Vec::new()
                    }
                }
            };
            let correlation_task = async {
                if !features.correlations {
                    return Vec::new();
                }
                match analyzers.correlations.analyze(&records).await {
                    Ok(findings) => findings,
                    Err(e) => {
                        warn!(subject_id = %subject_id, error = %e, "correlation analyzer failed");
                        Vec::new()
                    }
                }
            };
            let prediction_task = async {
                if !features.predictions {
                    return Vec::new();
                }
                match analyzers.predictions.analyze(&records, &goals).await {
                    Ok(findings) => findings,
                    Err(e) => {
                        warn!(subject_id = %subject_id, error = %e, "predictive analyzer failed");
                        Vec::new()
                    }
                }
            };
            let anomaly_task = async {
                if !features.anomalies {
                    return Vec::new();
                }
                match analyzers.anomalies.detect(&records).await {
                    Ok(findings) => findings,
                    Err(e) => {
                        warn!(subject_id = %subject_id, error = %e, "anomaly detector failed");
                        Vec::new()
                    }
                }
            };

            futures_util::join!(pattern_task, correlation_task, prediction_task, anomaly_task)
        } else {
            (Vec::new(), Vec::new(), Vec::new(), Vec::new())
        };

        let now = clock.now();
        let counts = CategoryCounts::tally(&records);
        let newest = records.last().map(|r| r.timestamp);
        let confidence = confidence::score(&counts, newest, now, &config.confidence);
        let insights = insight::generate(
            &records,
            &patterns,
            &correlations,
            &predictions,
            &config.insights,
        );

        let snapshot = AnalyticsSnapshot {
            patterns,
            correlations,
            predictions,
            anomalies,
            insights,
            has_minimum_data,
            confidence,
            generated_at: now,
        };

        let subject_tag = format!("subject:{subject_id}");
        cache.set(
            subject_id.clone(),
            snapshot.clone(),
            &["analytics", &subject_tag],
        );
        profiles
            .update(
                &subject_id,
                ProfileUpdate {
                    last_analyzed_at: Some(now),
                    health_score: Some(health::score(&snapshot, &config.health)),
                },
            )
            .await;

        Ok(snapshot)
    }
}

impl std::fmt::Debug for AnalyticsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyticsEngine")
            .field("config", &self.config)
            .field("cached_snapshots", &self.cache.len())
            .field("profiles", &self.profiles.len())
            .finish()
    }
}

//! The profile store: in-memory map of profiles, persisted fail-soft.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::ProfileBackend;
use crate::profile::{validate_profile, AnalyticsProfile, ProfileUpdate};

/// Backend key the whole profile map is stored under.
const STORAGE_KEY: &str = "lumen.analytics.profiles";

/// Durable store of per-subject analytics profiles.
///
/// The in-memory map is authoritative; the backend is best-effort
/// durability. Backend failures are logged and swallowed, so no persistence
/// problem ever surfaces to analytics callers.
pub struct ProfileStore {
    backend: Arc<dyn ProfileBackend>,
    profiles: RwLock<HashMap<String, AnalyticsProfile>>,
}

impl ProfileStore {
    pub fn new(backend: Arc<dyn ProfileBackend>) -> Self {
        Self {
            backend,
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Load persisted profiles, replacing the in-memory map.
    ///
    /// Records failing schema validation are skipped with a warning; the
    /// rest of the store loads normally. A missing or unreadable payload
    /// leaves the store empty.
    pub async fn load(&self) {
        let raw = match self.backend.get(STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "profile load failed, starting empty");
                return;
            }
        };

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "persisted profiles are not valid JSON, starting empty");
                return;
            }
        };
        let records = match parsed.as_object() {
            Some(records) => records,
            None => {
                warn!("persisted profiles are not a JSON object, starting empty");
                return;
            }
        };

        let mut loaded = HashMap::new();
        for (id, record) in records {
            match validate_profile(record) {
                Ok(profile) => {
                    loaded.insert(profile.subject_id.clone(), profile);
                }
                Err(e) => {
                    warn!(subject_id = %id, error = %e, "skipping invalid profile record");
                }
            }
        }
        debug!(count = loaded.len(), "profiles loaded");
        *self.write() = loaded;
    }

    /// Persist the current map. Failures are logged, never propagated.
    pub async fn save(&self) {
        let snapshot: HashMap<String, AnalyticsProfile> = self.read().clone();
        let payload = match serde_json::to_string(&snapshot) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "profile serialization failed, skipping save");
                return;
            }
        };
        if let Err(e) = self.backend.set(STORAGE_KEY, &payload).await {
            warn!(error = %e, "profile save failed, in-memory state remains authoritative");
        }
    }

    /// Create a profile for `subject_id` if none exists yet and persist it.
    /// Idempotent: a second call is a no-op. Returns true if a profile was
    /// created.
    pub async fn initialize(&self, subject_id: &str) -> bool {
        {
            let mut profiles = self.write();
            if profiles.contains_key(subject_id) {
                return false;
            }
            profiles.insert(
                subject_id.to_string(),
                AnalyticsProfile::initialized(subject_id),
            );
        }
        self.save().await;
        true
    }

    /// Merge `update` into an existing profile and persist. Updating an
    /// unknown subject is a logged no-op; the orchestrator always
    /// initializes before updating.
    pub async fn update(&self, subject_id: &str, update: ProfileUpdate) {
        {
            let mut profiles = self.write();
            match profiles.get_mut(subject_id) {
                Some(profile) => {
                    if let Some(at) = update.last_analyzed_at {
                        profile.last_analyzed_at = Some(at);
                    }
                    if let Some(score) = update.health_score {
                        profile.health_score = score.min(100);
                    }
                }
                None => {
                    warn!(subject_id, "update for unknown profile ignored");
                    return;
                }
            }
        }
        self.save().await;
    }

    /// Snapshot of one profile.
    pub fn get(&self, subject_id: &str) -> Option<AnalyticsProfile> {
        self.read().get(subject_id).cloned()
    }

    /// Snapshot of all profiles, in no particular order.
    pub fn all(&self) -> Vec<AnalyticsProfile> {
        self.read().values().cloned().collect()
    }

    /// Number of known profiles.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, AnalyticsProfile>> {
        self.profiles.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, AnalyticsProfile>> {
        self.profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

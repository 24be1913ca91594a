//! Persistence backend trait and the in-memory implementation.

use async_trait::async_trait;
use lumen_core::StoreError;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// String key/value persistence collaborator.
///
/// The profile store round-trips its whole state through this trait. The
/// exact medium (file, embedded KV store, browser storage behind a bridge)
/// is the embedding application's business.
#[async_trait]
pub trait ProfileBackend: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory backend. Useful for tests and for running without durability.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw view of a stored value, for assertions in tests.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Seed a raw value, e.g. to simulate a previous process's state.
    pub fn seed(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }
}

#[async_trait]
impl ProfileBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_roundtrip() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.get("k").await.unwrap(), None);
        backend.set("k", "v").await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_seed_visible_through_get() {
        let backend = InMemoryBackend::new();
        backend.seed("k", "seeded");
        assert_eq!(backend.get("k").await.unwrap(), Some("seeded".to_string()));
    }
}

//! Cache configuration.

use std::time::Duration;

/// Configuration for a [`TaggedCache`](crate::TaggedCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of entries held at once. Inserting a new key at
    /// capacity evicts the least recently used entry.
    pub max_entries: usize,
    /// Time-to-live for entries, measured from last access.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            ttl: Duration::from_secs(600), // 10 minutes
        }
    }
}

impl CacheConfig {
    /// Create a new cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum entry count.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Set the entry TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_config_builder() {
        let config = CacheConfig::new()
            .with_max_entries(32)
            .with_ttl(Duration::from_secs(60));
        assert_eq!(config.max_entries, 32);
        assert_eq!(config.ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_cache_config_defaults() {
        let config = CacheConfig::default();
        assert!(config.max_entries > 0);
        assert!(!config.ttl.is_zero());
    }
}

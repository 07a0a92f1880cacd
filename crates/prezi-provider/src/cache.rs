//! In-memory cache of resolved presentation metadata
//!
//! Only successful resolutions are stored; failures are always re-attempted
//! on the next call.

use crate::reference::PreziId;
use crate::resolver::Metadata;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default time-to-live for cached metadata (1 hour)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Metadata cache entry
#[derive(Debug, Clone)]
pub struct CachedMetadata {
    /// The metadata
    pub metadata: Metadata,
    /// When the entry was stored
    pub cached_at: Instant,
}

impl CachedMetadata {
    /// Create a new cache entry stamped now
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            cached_at: Instant::now(),
        }
    }

    /// Check if the entry has expired
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() > ttl
    }
}

/// TTL cache keyed by presentation ID
#[derive(Debug, Clone)]
pub struct MetadataCache {
    entries: HashMap<PreziId, CachedMetadata>,
    ttl: Duration,
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new()
    }
}

impl MetadataCache {
    /// Create a new cache with the default TTL
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CACHE_TTL)
    }

    /// Create a new cache with a custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Get the configured TTL
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get unexpired metadata for a presentation
    pub fn get(&mut self, id: &PreziId) -> Option<&Metadata> {
        self.cleanup_expired();
        self.entries.get(id).map(|entry| &entry.metadata)
    }

    /// Store metadata for a presentation
    pub fn insert(&mut self, id: PreziId, metadata: Metadata) {
        self.entries.insert(id, CachedMetadata::new(metadata));
    }

    /// Drop the entry for a presentation, returning it if present
    pub fn invalidate(&mut self, id: &PreziId) -> Option<Metadata> {
        self.entries.remove(id).map(|entry| entry.metadata)
    }

    /// Remove expired entries
    pub fn cleanup_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(title: &str) -> Metadata {
        Metadata {
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_cache_creation() {
        let cache = MetadataCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.ttl(), DEFAULT_CACHE_TTL);
    }

    #[test]
    fn test_cache_insert_get() {
        let mut cache = MetadataCache::new();
        let id = PreziId::new("abc");
        cache.insert(id.clone(), deck("My Deck"));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&id).map(|m| m.title.as_str()), Some("My Deck"));
    }

    #[test]
    fn test_cache_miss() {
        let mut cache = MetadataCache::new();
        assert!(cache.get(&PreziId::new("abc")).is_none());
    }

    #[test]
    fn test_cache_invalidate() {
        let mut cache = MetadataCache::new();
        let id = PreziId::new("abc");
        cache.insert(id.clone(), deck("Old"));

        assert_eq!(cache.invalidate(&id).map(|m| m.title), Some("Old".to_string()));
        assert!(cache.get(&id).is_none());
        assert!(cache.invalidate(&id).is_none());
    }

    #[test]
    fn test_cache_clear() {
        let mut cache = MetadataCache::new();
        cache.insert(PreziId::new("a"), deck("A"));
        cache.insert(PreziId::new("b"), deck("B"));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cache_expired() {
        let mut cache = MetadataCache::with_ttl(Duration::from_millis(10));
        let id = PreziId::new("abc");
        cache.insert(id.clone(), deck("Short-lived"));

        assert!(cache.get(&id).is_some());

        std::thread::sleep(Duration::from_millis(20));

        assert!(cache.get(&id).is_none());
        assert!(cache.is_empty());
    }
}

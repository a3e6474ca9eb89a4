//! Role map cache keyed by resource path and type set
//!
//! Entries go stale when an ACL or authorization changes; whoever enables the
//! cache must call [`RoleCache::invalidate_subtree`] or [`RoleCache::clear`]
//! on those mutations. TTL bounds the staleness otherwise.
//!
//! Every invalidation bumps a generation counter. A resolution captures the
//! generation before reading the store and its result is only cached if no
//! invalidation happened in between, so a revoked grant read by an in-flight
//! resolution never lands in the cache.

use blake3::Hasher;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::config::CacheConfig;
use crate::resource::ResourceNode;
use crate::roles::RoleMap;
use crate::types::ResourcePath;

/// Cache key type (BLAKE3 hash)
type CacheKey = [u8; 32];

#[derive(Clone)]
struct CachedEntry {
    path: ResourcePath,
    roles: RoleMap,
    generation: u64,
    cached_at: Instant,
}

impl CachedEntry {
    fn is_expired(&self, config: &CacheConfig) -> bool {
        self.cached_at.elapsed() > config.ttl()
    }
}

/// Thread-safe role map cache with TTL expiry
pub struct RoleCache {
    entries: Arc<DashMap<CacheKey, CachedEntry>>,
    config: CacheConfig,
    stats: Arc<DashMap<&'static str, usize>>,
    generation: AtomicU64,
}

impl RoleCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            config,
            stats: Arc::new(DashMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Current invalidation generation; capture it before reading the store
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Cached role map for `resource`, if fresh
    pub fn get(&self, resource: &ResourceNode) -> Option<RoleMap> {
        let key = Self::compute_key(&resource.path, &resource.types);

        if let Some(entry) = self.entries.get(&key) {
            if entry.is_expired(&self.config) {
                drop(entry);
                self.entries.remove(&key);
                self.increment_stat("expirations");
                self.increment_stat("misses");
                return None;
            }

            self.increment_stat("hits");
            return Some(entry.roles.clone());
        }

        self.increment_stat("misses");
        None
    }

    /// Cache `roles` for `resource` unless an invalidation happened since
    /// `generation` was captured. Returns whether the entry was kept.
    pub fn put(&self, resource: &ResourceNode, roles: RoleMap, generation: u64) -> bool {
        if self.config.capacity == 0 || self.generation() != generation {
            return false;
        }

        if self.entries.len() >= self.config.capacity {
            self.evict_expired_or_some();
        }

        let key = Self::compute_key(&resource.path, &resource.types);
        self.entries.insert(
            key,
            CachedEntry {
                path: resource.path.clone(),
                roles,
                generation,
                cached_at: Instant::now(),
            },
        );

        // An invalidation that raced the insert may have scanned before it
        if self.generation() != generation {
            self.entries.remove_if(&key, |_, entry| entry.generation == generation);
            return false;
        }

        true
    }

    /// Drop entries for exactly `path`
    pub fn invalidate(&self, path: &str) -> usize {
        self.remove_where(|entry_path| entry_path == path)
    }

    /// Drop entries for `path` and every resource beneath it
    pub fn invalidate_subtree(&self, path: &str) -> usize {
        let base = path.trim_end_matches('/');
        self.remove_where(|entry_path| {
            entry_path == path
                || entry_path
                    .strip_prefix(base)
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }

    /// Drop every entry. Hit and miss counters are kept.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.entries.clear();
    }

    fn remove_where<F>(&self, doomed: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        self.generation.fetch_add(1, Ordering::SeqCst);

        let mut removed = 0;
        self.entries.retain(|_, entry| {
            if doomed(&entry.path) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.get_stat("hits"),
            misses: self.get_stat("misses"),
            expirations: self.get_stat("expirations"),
            entries: self.entries.len(),
            max_entries: self.config.capacity,
        }
    }

    fn compute_key(path: &str, types: &HashSet<String>) -> CacheKey {
        let mut hasher = Hasher::new();
        hasher.update(path.as_bytes());

        let mut sorted: Vec<&String> = types.iter().collect();
        sorted.sort();
        for t in sorted {
            hasher.update(&[0]);
            hasher.update(t.as_bytes());
        }

        *hasher.finalize().as_bytes()
    }

    /// Remove expired entries, or a tenth of the cache when none expired
    fn evict_expired_or_some(&self) {
        let config = &self.config;
        self.entries.retain(|_, entry| !entry.is_expired(config));

        if self.entries.len() < self.config.capacity {
            return;
        }

        let to_remove = (self.config.capacity / 10).max(1);
        let mut removed = 0;
        self.entries.retain(|_, _| {
            if removed < to_remove {
                removed += 1;
                false
            } else {
                true
            }
        });
    }

    fn increment_stat(&self, key: &'static str) {
        *self.stats.entry(key).or_insert(0) += 1;
    }

    fn get_stat(&self, key: &'static str) -> usize {
        self.stats.get(key).map(|v| *v).unwrap_or(0)
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub expirations: usize,
    pub entries: usize,
    pub max_entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acl::Authorization;
    use crate::roles::aggregate;
    use crate::vocab::MODE_READ;
    use std::time::Duration;

    fn sample_roles() -> RoleMap {
        let auth = Authorization::new().with_agent("smith123").with_mode(MODE_READ);
        aggregate([&auth])
    }

    #[test]
    fn test_put_get() {
        let cache = RoleCache::new(CacheConfig::default());
        let node = ResourceNode::root("/webacl_box1");

        assert!(cache.get(&node).is_none());
        cache.put(&node, sample_roles(), cache.generation());

        let cached = cache.get(&node).unwrap();
        assert!(cached.has_mode("smith123", MODE_READ));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_types_are_part_of_key() {
        let cache = RoleCache::new(CacheConfig::default());
        let plain = ResourceNode::root("/img");
        let typed = ResourceNode::root("/img").with_type("http://example.com/terms#publicImage");

        cache.put(&plain, RoleMap::new(), cache.generation());
        assert!(cache.get(&typed).is_none());
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = RoleCache::new(CacheConfig {
            ttl_millis: 30,
            ..Default::default()
        });
        let node = ResourceNode::root("/a");

        cache.put(&node, sample_roles(), cache.generation());
        assert!(cache.get(&node).is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(cache.get(&node).is_none());
        assert_eq!(cache.stats().expirations, 1);
    }

    #[test]
    fn test_invalidate_subtree() {
        let cache = RoleCache::new(CacheConfig::default());
        let root = ResourceNode::root("/box");
        let child = ResourceNode::child_of(&root, "/box/a");
        let sibling = ResourceNode::root("/boxes");

        for node in [&root, &child, &sibling] {
            cache.put(node, sample_roles(), cache.generation());
        }

        assert_eq!(cache.invalidate_subtree("/box"), 2);
        assert!(cache.get(&sibling).is_some());
        assert_eq!(cache.invalidate("/boxes"), 1);
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn test_capacity_bound() {
        let cache = RoleCache::new(CacheConfig {
            capacity: 10,
            ..Default::default()
        });

        for i in 0..25 {
            cache.put(&ResourceNode::root(format!("/r{}", i)), RoleMap::new(), cache.generation());
        }
        assert!(cache.stats().entries <= 10);

        let disabled = RoleCache::new(CacheConfig {
            capacity: 0,
            ..Default::default()
        });
        assert!(!disabled.put(&ResourceNode::root("/x"), RoleMap::new(), disabled.generation()));
        assert_eq!(disabled.stats().entries, 0);
    }

    #[test]
    fn test_put_after_invalidation_is_discarded() {
        let cache = RoleCache::new(CacheConfig::default());
        let node = ResourceNode::root("/webacl_box1");

        let generation = cache.generation();
        cache.invalidate_subtree("/webacl_box1");

        assert!(!cache.put(&node, sample_roles(), generation));
        assert!(cache.get(&node).is_none());

        assert!(cache.put(&node, sample_roles(), cache.generation()));
        assert!(cache.get(&node).is_some());
    }

    #[test]
    fn test_clear_keeps_counters() {
        let cache = RoleCache::new(CacheConfig::default());
        let node = ResourceNode::root("/a");

        cache.put(&node, sample_roles(), cache.generation());
        assert!(cache.get(&node).is_some());
        assert!(cache.get(&ResourceNode::root("/b")).is_none());

        let generation = cache.generation();
        cache.clear();
        assert!(cache.generation() > generation);

        let stats = cache.stats();
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_invalidate_during_concurrent_puts() {
        let cache = Arc::new(RoleCache::new(CacheConfig::default()));

        let writer = {
            let cache = cache.clone();
            std::thread::spawn(move || {
                for i in 0..5_000 {
                    let node = ResourceNode::root(format!("/r{}", i));
                    cache.put(&node, RoleMap::new(), cache.generation());
                }
            })
        };

        for _ in 0..5_000 {
            assert_eq!(cache.invalidate("/nothing"), 0);
        }
        writer.join().unwrap();
    }
}

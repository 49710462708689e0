use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tracing::{debug, trace};

/// Default number of entries kept by an [`AnalysisCache`].
pub const DEFAULT_CACHE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
}

#[derive(Debug)]
struct Entries<V> {
    values: HashMap<String, V>,
    order: VecDeque<String>,
}

/// Bounded result cache with first-in-first-out eviction.
///
/// Reads never refresh an entry's position: once full, the entry inserted
/// earliest is dropped regardless of how often it was hit.
#[derive(Debug)]
pub struct AnalysisCache<V> {
    entries: Mutex<Entries<V>>,
    max_size: usize,
}

impl<V: Clone> AnalysisCache<V> {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Mutex::new(Entries {
                values: HashMap::new(),
                order: VecDeque::new(),
            }),
            max_size,
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let Ok(entries) = self.entries.lock() else {
            debug!("cache lock poisoned, treating read as a miss");
            return None;
        };
        let value = entries.values.get(key).cloned();
        trace!(key, hit = value.is_some(), "cache lookup");
        value
    }

    pub fn set(&self, key: String, value: V) {
        if self.max_size == 0 {
            return;
        }
        let Ok(mut entries) = self.entries.lock() else {
            debug!("cache lock poisoned, dropping write");
            return;
        };

        if let Some(slot) = entries.values.get_mut(&key) {
            *slot = value;
            return;
        }

        while entries.values.len() >= self.max_size {
            let Some(oldest) = entries.order.pop_front() else { break };
            entries.values.remove(&oldest);
            trace!(key = %oldest, "cache eviction");
        }

        entries.order.push_back(key.clone());
        entries.values.insert(key, value);
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.values.clear();
            entries.order.clear();
        }
    }

    pub fn stats(&self) -> CacheStats {
        let size = self.entries.lock().map(|e| e.values.len()).unwrap_or(0);
        CacheStats {
            size,
            max_size: self.max_size,
        }
    }
}

impl<V: Clone> Default for AnalysisCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

/// `"{chars}-{digest}"` where the digest covers the content and the JSON
/// form of `options`. Distinct inputs may collide on the truncated digest.
pub fn cache_key<O: Serialize + ?Sized>(content: &str, options: &O) -> String {
    let options = serde_json::to_string(options).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update(options.as_bytes());
    let digest = hasher.finalize();

    let hex: String = digest.iter().take(8).map(|b| format!("{:02x}", b)).collect();
    format!("{}-{}", content.chars().count(), hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisOptions;

    #[test]
    fn test_get_and_set() {
        let cache = AnalysisCache::new(3);
        assert_eq!(cache.get("a"), None);
        cache.set("a".to_string(), 1);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.stats(), CacheStats { size: 1, max_size: 3 });
    }

    #[test]
    fn test_fifo_eviction_ignores_reads() {
        let cache = AnalysisCache::new(2);
        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        // A hit does not protect "a" from eviction.
        assert_eq!(cache.get("a"), Some(1));
        cache.set("c".to_string(), 3);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.stats().size, 2);
    }

    #[test]
    fn test_overwrite_keeps_size() {
        let cache = AnalysisCache::new(2);
        cache.set("a".to_string(), 1);
        cache.set("a".to_string(), 5);
        assert_eq!(cache.stats().size, 1);
        assert_eq!(cache.get("a"), Some(5));
    }

    #[test]
    fn test_never_exceeds_max_size() {
        let cache = AnalysisCache::new(5);
        for i in 0..50 {
            cache.set(format!("key-{}", i), i);
            assert!(cache.stats().size <= 5);
        }
        assert_eq!(cache.get("key-49"), Some(49));
        assert_eq!(cache.get("key-44"), None);
    }

    #[test]
    fn test_clear() {
        let cache = AnalysisCache::new(4);
        cache.set("a".to_string(), "x".to_string());
        cache.clear();
        assert_eq!(cache.stats().size, 0);
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let cache = AnalysisCache::new(0);
        cache.set("a".to_string(), 1);
        assert_eq!(cache.stats(), CacheStats { size: 0, max_size: 0 });
    }

    #[test]
    fn test_cache_key_shape() {
        let options = AnalysisOptions::default();
        let key = cache_key("мир", &options);
        let (len, digest) = key.split_once('-').unwrap();
        assert_eq!(len, "3");
        assert_eq!(digest.len(), 16);
        assert_eq!(key, cache_key("мир", &options));

        let other = AnalysisOptions {
            reading_speed: Some(100),
            ..Default::default()
        };
        assert_ne!(key, cache_key("мир", &other));
        assert_ne!(key, cache_key("мор", &options));
    }

    #[test]
    fn test_stats_json() {
        let json = serde_json::to_value(CacheStats { size: 1, max_size: 100 }).unwrap();
        assert_eq!(json["maxSize"], 100);
    }
}

//! Bounded TTL cache for external lookups (author suggestions, object aliases).
//!
//! Entries expire lazily: staleness is only checked when a key is read. The
//! LRU bound keeps memory flat over the process lifetime, and the clock is
//! injected so expiry can be tested without sleeping.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

/// Source of "now" for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock used in production.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A cached value plus the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: Instant,
}

pub struct TtlCache<V> {
    entries: Mutex<LruCache<String, CacheEntry<V>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self::with_clock(capacity, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(capacity: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            clock,
        }
    }

    /// Cache keys are trimmed and lower-cased so "M31 " and "m31" share an entry.
    pub fn normalize_key(key: &str) -> String {
        key.trim().to_lowercase()
    }

    /// Returns the value if present and younger than the TTL. Stale entries
    /// are evicted on the way out.
    pub fn get(&self, key: &str) -> Option<V> {
        let key = Self::normalize_key(key);
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let expired = match entries.get(&key) {
            Some(entry) => now.saturating_duration_since(entry.inserted_at) > self.ttl,
            None => return None,
        };

        if expired {
            entries.pop(&key);
            return None;
        }
        entries.get(&key).map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: &str, value: V) {
        let entry = CacheEntry {
            value,
            inserted_at: self.clock.now(),
        };
        self.entries.lock().put(Self::normalize_key(key), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clock that only moves when told to.
    struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        fn advance(&self, by: Duration) {
            *self.now.lock() += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock()
        }
    }

    fn cache_with_clock(capacity: usize) -> (TtlCache<Vec<String>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::with_clock(capacity, Duration::from_secs(3600), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_get_returns_inserted_value() {
        let (cache, _) = cache_with_clock(8);
        cache.insert("M31", vec!["M31".to_string(), "NGC 224".to_string()]);
        assert_eq!(
            cache.get("M31"),
            Some(vec!["M31".to_string(), "NGC 224".to_string()])
        );
    }

    #[test]
    fn test_keys_are_case_and_whitespace_normalized() {
        let (cache, _) = cache_with_clock(8);
        cache.insert("  Smith ", vec!["Smith, J.".to_string()]);
        assert!(cache.get("smith").is_some());
        assert!(cache.get("SMITH").is_some());
    }

    #[test]
    fn test_entry_survives_until_ttl() {
        let (cache, clock) = cache_with_clock(8);
        cache.insert("m31", vec![]);
        clock.advance(Duration::from_secs(3600));
        assert_eq!(cache.get("m31"), Some(vec![]));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let (cache, clock) = cache_with_clock(8);
        cache.insert("m31", vec!["M31".to_string()]);
        clock.advance(Duration::from_secs(3601));
        assert_eq!(cache.get("m31"), None);
        // Lazy expiry evicts on read
        assert!(cache.is_empty());
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let (cache, _) = cache_with_clock(2);
        cache.insert("a", vec![]);
        cache.insert("b", vec![]);
        assert!(cache.get("a").is_some());
        cache.insert("c", vec![]);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_zero_capacity_still_holds_one_entry() {
        let (cache, _) = cache_with_clock(0);
        cache.insert("a", vec![]);
        assert_eq!(cache.len(), 1);
    }
}

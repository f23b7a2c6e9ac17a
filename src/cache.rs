//! # Loader Cache
//!
//! Single-slot cache holding the most recently merged [`LoaderSet`].
//!
//! ## Overview
//!
//! The entry is `None` ("unknown, must recompute") or `Some(set)` ("valid until
//! invalidated"). There is no expiry; only [`LoaderCache::invalidate`] clears it.
//!
//! Two locks cooperate:
//!
//! - `entry` is a read/write lock over the slot. [`LoaderCache::read`] takes it
//!   shared, so the hot path never waits behind another reader.
//! - `monitor` is the population guard. Writers, invalidation and the slow path
//!   of the resolver all run while holding it, so a recomputation and an
//!   invalidation from another thread can never interleave and two threads never
//!   populate the slot after the same miss.
//!
//! The guard is re-entrant. Host callbacks that run during a recomputation may
//! change the watched attribute, and the resulting invalidation runs on the same
//! thread without deadlocking. Every invalidation bumps a generation counter; a
//! [`CacheGuard`] only stores its result if no invalidation happened since it
//! was taken.

use crate::loader::LoaderSet;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Single-entry loader cache with a population guard
pub struct LoaderCache {
    entry: RwLock<Option<LoaderSet>>,
    monitor: ReentrantMutex<()>,
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    computations: AtomicU64,
    invalidations: AtomicU64,
}

impl LoaderCache {
    pub fn new() -> Self {
        Self {
            entry: RwLock::new(None),
            monitor: ReentrantMutex::new(()),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            computations: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
        }
    }

    /// Current entry, without side effects on the slot
    pub fn read(&self) -> Option<LoaderSet> {
        let cached = self.entry.read().clone();
        if cached.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        cached
    }

    /// Replace the entry. May be called while holding a [`CacheGuard`] on the
    /// same thread.
    pub fn write(&self, set: LoaderSet) {
        self.lock().write(set);
    }

    /// Clear the entry. Idempotent.
    pub fn invalidate(&self) {
        let _monitor = self.monitor.lock();
        *self.entry.write() = None;
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.invalidations.fetch_add(1, Ordering::Relaxed);
        debug!("Loader cache invalidated");
    }

    /// Take the population guard
    pub fn lock(&self) -> CacheGuard<'_> {
        let monitor = self.monitor.lock();
        CacheGuard {
            cache: self,
            generation: self.generation.load(Ordering::Acquire),
            _monitor: monitor,
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            computations: self.computations.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            populated: self.entry.read().is_some(),
        }
    }
}

impl Default for LoaderCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive access to the cache for a read-compute-write sequence
pub struct CacheGuard<'a> {
    cache: &'a LoaderCache,
    generation: u64,
    _monitor: ReentrantMutexGuard<'a, ()>,
}

impl CacheGuard<'_> {
    /// Re-check the entry under the guard
    pub fn read(&self) -> Option<LoaderSet> {
        self.cache.read()
    }

    /// Record one merge computation
    pub fn record_computation(&self) {
        self.cache.computations.fetch_add(1, Ordering::Relaxed);
    }

    /// Store `set` unless the cache was invalidated since this guard was taken.
    /// Returns whether the set was stored.
    pub fn write(&self, set: LoaderSet) -> bool {
        if self.cache.generation.load(Ordering::Acquire) != self.generation {
            debug!("Discarding loader set computed before an invalidation");
            return false;
        }
        *self.cache.entry.write() = Some(set);
        true
    }
}

/// Counters describing cache behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Merge computations performed by the resolver
    pub computations: u64,
    pub invalidations: u64,
    pub populated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::NamedLoader;

    fn sample_set() -> LoaderSet {
        LoaderSet::from_loaders(vec![NamedLoader::shared("a", ["x.Y"])])
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache = LoaderCache::new();
        assert!(cache.read().is_none());
        assert!(!cache.stats().populated);
    }

    #[test]
    fn test_write_then_read_returns_same_set() {
        let cache = LoaderCache::new();
        let set = sample_set();
        cache.write(set.clone());

        let cached = cache.read().unwrap();
        assert!(cached.ptr_eq(&set));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_invalidate_is_idempotent() {
        let cache = LoaderCache::new();
        cache.write(sample_set());

        cache.invalidate();
        cache.invalidate();

        assert!(cache.read().is_none());
        let stats = cache.stats();
        assert_eq!(stats.invalidations, 2);
        assert!(!stats.populated);
    }

    #[test]
    fn test_guard_serializes_with_invalidate() {
        use std::sync::Arc;
        use std::thread;
        use std::time::Duration;

        let cache = Arc::new(LoaderCache::new());
        let guard = cache.lock();

        let invalidator = {
            let cache = cache.clone();
            thread::spawn(move || cache.invalidate())
        };

        // The invalidation cannot complete while the guard is held
        thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.stats().invalidations, 0);
        guard.write(sample_set());
        drop(guard);

        invalidator.join().unwrap();
        assert!(cache.read().is_none());
    }

    #[test]
    fn test_invalidate_on_guard_thread_discards_pending_write() {
        let cache = LoaderCache::new();
        let guard = cache.lock();

        cache.invalidate();
        assert!(!guard.write(sample_set()));
        drop(guard);

        assert!(cache.read().is_none());
        assert_eq!(cache.stats().invalidations, 1);
    }

    #[test]
    fn test_write_while_holding_guard() {
        let cache = LoaderCache::new();
        let guard = cache.lock();
        let set = sample_set();

        cache.write(set.clone());
        assert!(guard.read().unwrap().ptr_eq(&set));
        drop(guard);

        assert!(cache.read().unwrap().ptr_eq(&set));
    }
}

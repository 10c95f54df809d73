//! Cache capability for the built configuration.
//!
//! The builder only needs `get`/`set`/`invalidate` over serialized strings, so
//! any host cache can back it. [`MemoryCache`] is the in-process default.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

/// How long a cache entry stays valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheLifetime {
    /// Until explicitly invalidated
    Indefinite,
    For(Duration),
}

pub trait CacheStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String, lifetime: CacheLifetime);
    fn invalidate(&self, key: &str);
}

impl<T: CacheStore + ?Sized> CacheStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: String, lifetime: CacheLifetime) {
        (**self).set(key, value, lifetime)
    }

    fn invalidate(&self, key: &str) {
        (**self).invalidate(key)
    }
}

#[derive(Debug, Clone)]
struct CachedEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CachedEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// In-memory [`CacheStore`]
///
/// Uses RwLock for concurrent read access with occasional write for cache updates.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CachedEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry
    pub fn clear(&self) {
        tracing::info!("Clearing content block cache");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Get cache statistics (for debugging/monitoring)
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        CacheStats {
            entries: entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let found = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            entries.get(key).map(|entry| {
                if entry.is_expired(now) {
                    None
                } else {
                    Some(entry.value.clone())
                }
            })
        };

        match found {
            Some(Some(value)) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            Some(None) => {
                tracing::debug!("Cache entry '{}' expired", key);
                self.entries
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .remove(key);
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn set(&self, key: &str, value: String, lifetime: CacheLifetime) {
        let expires_at = match lifetime {
            CacheLifetime::Indefinite => None,
            CacheLifetime::For(duration) => Some(Instant::now() + duration),
        };

        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), CachedEntry { value, expires_at });
    }

    fn invalidate(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

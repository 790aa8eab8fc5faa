//! Bounded TTL cache for translation results.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::Lang;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry limit; 0 disables caching.
    pub max_entries: usize,
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            ttl_secs: 3600,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: Lang,
    pub target: Lang,
    pub text: String,
}

impl CacheKey {
    pub fn new(source: Lang, target: Lang, text: impl Into<String>) -> Self {
        Self {
            source,
            target,
            text: text.into(),
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    translation: String,
    created_at: Instant,
    hit_count: u64,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<CacheKey, CacheEntry>,
    /// Keys in first-insertion order; the front is evicted first.
    order: VecDeque<CacheKey>,
}

impl CacheInner {
    fn remove(&mut self, key: &CacheKey) {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    /// hits / (hits + entries) as a percentage.
    pub hit_rate: f64,
}

/// Translation cache keyed by (source, target, text).
///
/// Expired entries stay in memory until the next lookup of the same key.
#[derive(Debug)]
pub struct TranslationCache {
    config: CacheConfig,
    inner: Mutex<CacheInner>,
}

impl TranslationCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&self, key: CacheKey, translation: String) {
        self.insert_at(key, translation, Instant::now());
    }

    pub(crate) fn get_at(&self, key: &CacheKey, now: Instant) -> Option<String> {
        let mut inner = self.lock();
        let expired = match inner.entries.get(key) {
            None => return None,
            Some(entry) => now.saturating_duration_since(entry.created_at) > self.config.ttl(),
        };
        if expired {
            inner.remove(key);
            return None;
        }
        inner.entries.get_mut(key).map(|entry| {
            entry.hit_count += 1;
            entry.translation.clone()
        })
    }

    /// Re-inserting an existing key refreshes its value and age but keeps its eviction position.
    pub(crate) fn insert_at(&self, key: CacheKey, translation: String, now: Instant) {
        if self.config.max_entries == 0 {
            return;
        }
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.translation = translation;
            entry.created_at = now;
            return;
        }
        while inner.entries.len() >= self.config.max_entries {
            match inner.order.pop_front() {
                Some(oldest) => {
                    inner.entries.remove(&oldest);
                }
                None => break,
            }
        }
        inner.order.push_back(key.clone());
        inner.entries.insert(
            key,
            CacheEntry {
                translation,
                created_at: now,
                hit_count: 0,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let size = inner.entries.len();
        let hits: u64 = inner.entries.values().map(|e| e.hit_count).sum();
        let denominator = hits + size as u64;
        let hit_rate = if denominator == 0 {
            0.0
        } else {
            hits as f64 / denominator as f64 * 100.0
        };
        CacheStats {
            size,
            max_size: self.config.max_entries,
            hit_rate,
        }
    }
}

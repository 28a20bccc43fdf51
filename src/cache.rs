//! Process-wide memoization of read queries.
//!
//! Entries expire lazily after a TTL, and the map is bounded: when full, the
//! oldest *inserted* key is evicted. Reads never refresh a key's position,
//! and overwriting a key keeps its original position while restarting its
//! TTL. Write paths drop the whole cache instead of tracking which entries a
//! mutation touched.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::post::Post;
use crate::models::config::CacheConfig;

/// Time source for TTL checks, injectable so expiry is testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time source used outside of tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Results a read query may memoize.
#[derive(Debug, Clone)]
pub enum CachedValue {
    /// One page of a post listing with its pre-pagination total.
    PostPage { total: usize, posts: Vec<Post> },
    Post(Post),
    Categories(Vec<Category>),
}

struct CacheEntry {
    value: CachedValue,
    stored_at: Instant,
}

struct CacheState {
    entries: HashMap<String, CacheEntry>,
    insertion_order: VecDeque<String>,
}

/// Mutex-guarded TTL cache fronting the read services.
pub struct QueryCache {
    state: Mutex<CacheState>,
    ttl: Duration,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl QueryCache {
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                insertion_order: VecDeque::new(),
            }),
            ttl: config.ttl,
            capacity: config.capacity.max(1),
            clock,
        }
    }

    /// The cache holds plain data, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fetch a live entry. Expired entries are deleted on the spot.
    pub fn get(&self, key: &str) -> Option<CachedValue> {
        let mut state = self.lock();
        let expired = match state.entries.get(key) {
            Some(entry) => self.clock.now().duration_since(entry.stored_at) > self.ttl,
            None => return None,
        };
        if expired {
            state.entries.remove(key);
            state.insertion_order.retain(|k| k != key);
            return None;
        }
        state.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store a value, evicting the oldest insertion on overflow.
    pub fn set(&self, key: impl Into<String>, value: CachedValue) {
        let key = key.into();
        let mut state = self.lock();
        let entry = CacheEntry {
            value,
            stored_at: self.clock.now(),
        };
        if state.entries.insert(key.clone(), entry).is_none() {
            state.insertion_order.push_back(key);
            if state.insertion_order.len() > self.capacity {
                if let Some(oldest) = state.insertion_order.pop_front() {
                    state.entries.remove(&oldest);
                }
            }
        }
    }

    /// Drop every entry whose key starts with `prefix`.
    ///
    /// An exact key is its own prefix, so this also removes single entries.
    /// Passing a query name (the part before the serialized options) drops
    /// all cached variants of that query.
    pub fn invalidate(&self, prefix: &str) {
        let mut state = self.lock();
        let CacheState {
            entries,
            insertion_order,
        } = &mut *state;
        entries.retain(|key, _| !key.starts_with(prefix));
        insertion_order.retain(|key| entries.contains_key(key));
    }

    /// Drop everything. Every write path calls this before returning.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.insertion_order.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Deterministic cache key: query name plus the serialized option set.
pub fn cache_key<T: Serialize>(query: &str, options: &T) -> String {
    match serde_json::to_string(options) {
        Ok(options) => format!("{query}_{options}"),
        Err(e) => {
            log::warn!("Failed to serialize cache options for {query}: {e}");
            query.to_string()
        }
    }
}

//! Requests - bookkeeping around calls to the wallet service
//!
//! - **Request**: one remote operation; remembers whether it ran, its last
//!   result and its last error.
//! - **CachedRequest**: key-value cache of fetch results. `invalidate` marks
//!   entries stale so the next `execute` re-fetches.
//!
//! # Invalidate-then-refetch
//!
//! ```text
//! invalidate(immediately) ──► entries stale (or dropped)
//!          │
//!          ▼
//! execute(key, fetch) ──► fresh hit? ── yes ──► cached value
//!          │ no
//!          ▼
//!       fetch().await ──► Ok  → store + return
//!                       └► Err → keep old value, record error
//! ```

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};

use crate::error::StoreResult;

fn lock<S>(m: &Mutex<S>) -> MutexGuard<'_, S> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

#[derive(Debug)]
struct RequestState<T> {
    executing: bool,
    executed: bool,
    result: Option<T>,
    error: Option<String>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self { Self { executing: false, executed: false, result: None, error: None } }
}

/// Single remote operation with its last outcome
#[derive(Debug)]
pub struct Request<T> {
    name: &'static str,
    state: Mutex<RequestState<T>>,
}

impl<T: Clone> Request<T> {
    pub fn new(name: &'static str) -> Self { Self { name, state: Mutex::new(RequestState::default()) } }

    pub fn name(&self) -> &'static str { self.name }

    pub async fn execute<F>(&self, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        {
            let mut s = lock(&self.state);
            s.executing = true;
            s.error = None;
        }
        let outcome = call.await;
        let mut s = lock(&self.state);
        s.executing = false;
        s.executed = true;
        match &outcome {
            Ok(value) => s.result = Some(value.clone()),
            Err(e) => {
                tracing::warn!(request = self.name, error = %e, "request failed");
                s.error = Some(e.to_string());
            }
        }
        outcome
    }

    pub fn is_executing(&self) -> bool { lock(&self.state).executing }
    pub fn was_executed(&self) -> bool { lock(&self.state).executed }
    pub fn result(&self) -> Option<T> { lock(&self.state).result.clone() }
    pub fn error(&self) -> Option<String> { lock(&self.state).error.clone() }

    pub fn reset(&self) { *lock(&self.state) = RequestState::default(); }
}

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: DateTime<Utc>,
    stale: bool,
}

#[derive(Debug)]
struct CacheState<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    in_flight: usize,
    error: Option<String>,
}

/// Cache of fetch results keyed by call arguments
#[derive(Debug)]
pub struct CachedRequest<K, V> {
    name: &'static str,
    state: Mutex<CacheState<K, V>>,
}

impl<K, V> CachedRequest<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(name: &'static str) -> Self {
        Self { name, state: Mutex::new(CacheState { entries: HashMap::new(), in_flight: 0, error: None }) }
    }

    pub fn name(&self) -> &'static str { self.name }

    /// Return the fresh cached value for `key`, or run `fetch` and cache its result.
    pub async fn execute<F, Fut>(&self, key: K, fetch: F) -> StoreResult<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StoreResult<V>>,
    {
        {
            let mut s = lock(&self.state);
            if let Some(entry) = s.entries.get(&key).filter(|e| !e.stale) {
                return Ok(entry.value.clone());
            }
            s.in_flight += 1;
        }

        let outcome = fetch().await;

        let mut s = lock(&self.state);
        s.in_flight -= 1;
        match &outcome {
            Ok(value) => {
                s.error = None;
                s.entries.insert(key, CacheEntry { value: value.clone(), fetched_at: Utc::now(), stale: false });
            }
            Err(e) => {
                tracing::warn!(request = self.name, error = %e, "fetch failed");
                s.error = Some(e.to_string());
            }
        }
        outcome
    }

    /// Last stored value for `key`, fresh or stale
    pub fn cached(&self, key: &K) -> Option<V> {
        lock(&self.state).entries.get(key).map(|e| e.value.clone())
    }

    pub fn fetched_at(&self, key: &K) -> Option<DateTime<Utc>> {
        lock(&self.state).entries.get(key).map(|e| e.fetched_at)
    }

    /// Mark every entry stale; `immediately` drops them outright.
    pub fn invalidate(&self, immediately: bool) {
        let mut s = lock(&self.state);
        if immediately {
            s.entries.clear();
        } else {
            s.entries.values_mut().for_each(|e| e.stale = true);
        }
        tracing::debug!(request = self.name, immediately, "cache invalidated");
    }

    /// Mutate the cached value for `key` in place. Returns false when nothing is cached.
    pub fn patch(&self, key: &K, f: impl FnOnce(&mut V)) -> bool {
        match lock(&self.state).entries.get_mut(key) {
            Some(entry) => { f(&mut entry.value); true }
            None => false,
        }
    }

    pub fn is_executing(&self) -> bool { lock(&self.state).in_flight > 0 }
    pub fn error(&self) -> Option<String> { lock(&self.state).error.clone() }
    pub fn len(&self) -> usize { lock(&self.state).entries.len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

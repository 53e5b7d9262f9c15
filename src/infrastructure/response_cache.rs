use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::{error, trace};

struct CachedResponse {
    body: Value,
    stored_at: Instant,
}

/// Short-lived cache of decoded API responses, keyed by full request URL.
///
/// Entries older than the TTL are never served. A zero TTL disables caching.
pub struct ResponseCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedResponse>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &str, now: Instant) -> Option<Value> {
        if self.ttl.is_zero() {
            return None;
        }

        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("ResponseCache: lock poisoned during read, recovering");
                poisoned.into_inner()
            }
        };

        let hit = entries
            .get(key)
            .filter(|entry| now.saturating_duration_since(entry.stored_at) < self.ttl)
            .map(|entry| entry.body.clone());

        if hit.is_some() {
            trace!("ResponseCache: HIT for {}", key);
        }
        hit
    }

    pub fn insert(&self, key: impl Into<String>, body: Value) {
        self.insert_at(key, body, Instant::now());
    }

    pub fn insert_at(&self, key: impl Into<String>, body: Value, now: Instant) {
        if self.ttl.is_zero() {
            return;
        }

        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("ResponseCache: lock poisoned during write, recovering");
                poisoned.into_inner()
            }
        };

        let ttl = self.ttl;
        entries.retain(|_, entry| now.saturating_duration_since(entry.stored_at) < ttl);
        entries.insert(
            key.into(),
            CachedResponse {
                body,
                stored_at: now,
            },
        );
    }

    pub fn clear(&self) {
        match self.entries.write() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

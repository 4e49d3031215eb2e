use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use mensa::domain::CacheEntry;
use mensa::ports::TtlStore;
use shared::Result;
use std::time::Duration;
use tracing::trace;

pub mod sled_store;

pub use sled_store::SledStore;

/// DashMap-backed in-memory TTL store.
///
/// Each trait call touches a single entry under its shard lock, so a value
/// is never observed with a mismatched expiry. Expired entries are purged
/// lazily by the lookup that runs into them; expiry itself is re-checked on
/// every call, so correctness never depends on the purge having run.
pub struct MemoryStore<V> {
    entries: DashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
}

impl<V> MemoryStore<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }
}

#[async_trait]
impl<V> TtlStore<V> for MemoryStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<V>> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(Utc::now()) {
                return Ok(Some(entry.value.clone()));
            }
        }
        // Lazy purge; the deadline is re-checked under the shard lock.
        if self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(Utc::now()))
            .is_some()
        {
            trace!("purged expired entry {key}");
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: V, ttl: Option<Duration>) -> Result<()> {
        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn has(&self, key: &str) -> Result<bool> {
        match self.entries.get(key) {
            Some(entry) => Ok(!entry.is_expired(Utc::now())),
            None => Ok(false),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

impl<V> std::fmt::Debug for MemoryStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.entries.len())
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

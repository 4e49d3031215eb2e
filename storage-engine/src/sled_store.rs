use async_trait::async_trait;
use chrono::Utc;
use mensa::domain::CacheEntry;
use mensa::ports::TtlStore;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::Result;
use sled::Db;
use std::marker::PhantomData;
use std::path::Path;
use std::time::Duration;
use tracing::trace;

const ENTRIES_TREE: &str = "entries";

/// Sled-backed TTL store.
///
/// Entries are stored as JSON together with their expiry, so a reopened
/// database keeps honoring deadlines written by an earlier process. I/O and
/// codec failures surface as `shared::Error`, distinct from a plain miss.
pub struct SledStore<V> {
    db: Db,
    default_ttl: Duration,
    _value: PhantomData<V>,
}

impl<V> SledStore<V> {
    pub fn new<P: AsRef<Path>>(path: P, default_ttl: Duration) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self {
            db,
            default_ttl,
            _value: PhantomData,
        })
    }

    fn entries_tree(&self) -> Result<sled::Tree> {
        Ok(self.db.open_tree(ENTRIES_TREE)?)
    }
}

#[async_trait]
impl<V> TtlStore<V> for SledStore<V>
where
    V: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<Option<V>> {
        let tree = self.entries_tree()?;
        let Some(bytes) = tree.get(key.as_bytes())? else {
            return Ok(None);
        };

        let entry: CacheEntry<V> = serde_json::from_slice(&bytes)?;
        if entry.is_expired(Utc::now()) {
            trace!("purged expired entry {key}");
            tree.remove(key.as_bytes())?;
            return Ok(None);
        }
        Ok(Some(entry.value))
    }

    async fn set(&self, key: &str, value: V, ttl: Option<Duration>) -> Result<()> {
        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));
        let bytes = serde_json::to_vec(&entry)?;
        self.entries_tree()?.insert(key.as_bytes(), bytes)?;
        Ok(())
    }

    async fn has(&self, key: &str) -> Result<bool> {
        let tree = self.entries_tree()?;
        match tree.get(key.as_bytes())? {
            Some(bytes) => {
                let entry: CacheEntry<V> = serde_json::from_slice(&bytes)?;
                Ok(!entry.is_expired(Utc::now()))
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.entries_tree()?.remove(key.as_bytes())?.is_some())
    }

    async fn clear(&self) -> Result<()> {
        self.entries_tree()?.clear()?;
        Ok(())
    }
}

impl<V> std::fmt::Debug for SledStore<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledStore")
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

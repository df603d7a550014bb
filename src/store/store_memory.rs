use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::store::{KvStore, ListOptions, ListPage, StoreError};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map(|at| now < at).unwrap_or(true)
    }
}

/// In-process store. Expired entries are hidden on read and dropped lazily on write.
/// Listing walks keys in lexical order; the cursor is the last key returned.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<BTreeMap<String, Entry>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.inner.read().await.values().filter(|e| e.is_live(now)).count()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let map = self.inner.read().await;
        Ok(map
            .get(key)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| entry.value.clone()))
    }

    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut map = self.inner.write().await;
        map.retain(|_, entry| entry.is_live(now));
        map.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at: ttl.map(|ttl| now + ttl),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.inner.write().await.remove(key);
        Ok(())
    }

    async fn list(&self, options: ListOptions) -> Result<ListPage, StoreError> {
        let now = Instant::now();
        let limit = options.limit.max(1);
        let prefix = options.prefix.unwrap_or_default();
        let lower = match options.cursor {
            Some(cursor) => Bound::Excluded(cursor),
            None => Bound::Unbounded,
        };

        let map = self.inner.read().await;
        let mut matching = map
            .range::<String, _>((lower, Bound::Unbounded))
            .filter(|(key, entry)| key.starts_with(&prefix) && entry.is_live(now))
            .map(|(key, _)| key.clone());

        let keys: Vec<String> = matching.by_ref().take(limit).collect();
        let list_complete = matching.next().is_none();
        let cursor = if list_complete { None } else { keys.last().cloned() };

        Ok(ListPage {
            keys,
            list_complete,
            cursor,
        })
    }
}

//! Key-value store adapter
//!
//! A single logical namespace used both as the upstream credential cache and
//! as the scoped-token directory. Backends: in-process memory and Redis.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::config::settings::{StoreConfig, StoreType};
use crate::errors::ConfigurationError;

pub mod store_memory;
pub mod store_redis;

pub use store_memory::MemoryStore;
pub use store_redis::RedisStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("invalid list cursor '{0}'")]
    InvalidCursor(String),

    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub prefix: Option<String>,
    /// cursor returned by the previous page, `None` for the first page
    pub cursor: Option<String>,
    pub limit: usize,
}

/// One page of a cursor-based listing. A page may be incomplete even when it
/// holds fewer than `limit` keys; callers loop until `list_complete`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    pub list_complete: bool,
    pub cursor: Option<String>,
}

#[async_trait]
pub trait KvStore: Send + Sync {
    /// `Ok(None)` when the key is absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;

    async fn delete(&self, key: &str) -> Result<(), StoreError>;

    async fn list(&self, options: ListOptions) -> Result<ListPage, StoreError>;
}

pub type SharedStore = Arc<dyn KvStore>;

/// Resolve the configured store once at startup.
pub async fn build_store(config: &StoreConfig) -> anyhow::Result<SharedStore> {
    match config.store_type {
        StoreType::Memory => {
            info!("using in-memory store '{}'", config.name);
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreType::Redis => {
            let url = config
                .url
                .as_deref()
                .filter(|url| !url.is_empty())
                .ok_or_else(|| ConfigurationError::StoreUrlMissing(config.name.clone()))?;
            info!("connecting redis store '{}'", config.name);
            let store = RedisStore::connect(url, &config.name).await?;
            Ok(Arc::new(store))
        }
    }
}

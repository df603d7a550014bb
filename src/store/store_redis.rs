use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

use crate::store::{KvStore, ListOptions, ListPage, StoreError};

const SCAN_START: &str = "0";

/// Redis-backed store. Every key lives under `{namespace}:` so several relays
/// can share one database.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    namespace: String,
}

impl RedisStore {
    pub async fn connect(url: &str, namespace: &str) -> Result<Self, StoreError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self {
            conn,
            namespace: namespace.to_owned(),
        })
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.namespace, key)
    }
}

/// Key relative to `namespace`, `None` for keys outside it.
fn strip_namespace<'a>(namespace: &str, key: &'a str) -> Option<&'a str> {
    key.strip_prefix(namespace)
        .and_then(|rest| rest.strip_prefix(':'))
}

/// Escape glob metacharacters so a literal prefix can go into `SCAN MATCH`.
fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        Ok(conn.get::<_, Option<String>>(self.namespaced(key)).await?)
    }

    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let key = self.namespaced(key);
        match ttl {
            Some(ttl) => conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1)).await?,
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(self.namespaced(key)).await?;
        Ok(())
    }

    async fn list(&self, options: ListOptions) -> Result<ListPage, StoreError> {
        let mut conn = self.conn.clone();
        let cursor = options.cursor.unwrap_or_else(|| SCAN_START.to_owned());
        if cursor.parse::<u64>().is_err() {
            return Err(StoreError::InvalidCursor(cursor));
        }
        let pattern = format!(
            "{}*",
            escape_glob(&self.namespaced(options.prefix.as_deref().unwrap_or_default()))
        );

        let (next, raw_keys): (String, Vec<String>) = redis::cmd("SCAN")
            .arg(&cursor)
            .arg("MATCH")
            .arg(&pattern)
            .arg("COUNT")
            .arg(options.limit.max(1))
            .query_async(&mut conn)
            .await?;
        debug!("scan cursor {} -> {}, {} keys", cursor, next, raw_keys.len());

        let keys = raw_keys
            .iter()
            .filter_map(|key| strip_namespace(&self.namespace, key))
            .map(str::to_owned)
            .collect();
        let list_complete = next == SCAN_START;

        Ok(ListPage {
            keys,
            list_complete,
            cursor: (!list_complete).then_some(next),
        })
    }
}

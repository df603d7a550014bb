use serde::Serialize;
use tracing::{debug, info, warn};

use crate::auth::scoped_token::{generate_scoped_token, is_scoped_token};
use crate::errors::RelayError;
use crate::store::{ListOptions, SharedStore};
use crate::utils::constants::{
    MAX_TOKEN_GENERATION_ATTEMPTS, SCOPED_TOKEN_PREFIX, SCOPED_TOKEN_SUFFIX_LEN,
};

/// Scoped token and the openid it is bound to
#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct TokenEntry {
    pub key: String,
    pub value: String,
}

/// CRUD over scoped tokens. Authorization happens before these calls.
#[derive(Clone)]
pub struct TokenRegistry {
    store: SharedStore,
    page_size: usize,
}

impl TokenRegistry {
    pub fn new(store: SharedStore, page_size: usize) -> Self {
        Self { store, page_size }
    }

    /// Every scoped token in the store, following the listing cursor to the end.
    pub async fn list(&self) -> Result<Vec<TokenEntry>, RelayError> {
        let mut tokens = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .store
                .list(ListOptions {
                    prefix: Some(SCOPED_TOKEN_PREFIX.to_owned()),
                    cursor: cursor.take(),
                    limit: self.page_size,
                })
                .await?;
            pages += 1;
            debug!(
                "token list page {}: keys={}, list_complete={}",
                pages,
                page.keys.len(),
                page.list_complete
            );

            for key in page.keys.into_iter().filter(|key| is_scoped_token(key)) {
                match self.store.get(&key).await? {
                    Some(value) if !value.is_empty() => tokens.push(TokenEntry { key, value }),
                    _ => debug!("skipping token {} without value", key),
                }
            }

            match page.cursor {
                Some(next) if !page.list_complete => cursor = Some(next),
                _ => break,
            }
        }

        debug!("total tokens found: {}", tokens.len());
        Ok(tokens)
    }

    /// Bind a freshly generated scoped token to `openid`.
    pub async fn create(&self, openid: &str) -> Result<TokenEntry, RelayError> {
        self.create_with(openid, || generate_scoped_token(SCOPED_TOKEN_SUFFIX_LEN))
            .await
    }

    /// Like `create` with a caller-supplied key generator. An existing key is
    /// never overwritten; generation is retried a bounded number of times.
    pub async fn create_with<F>(&self, openid: &str, mut generate: F) -> Result<TokenEntry, RelayError>
    where
        F: FnMut() -> String + Send,
    {
        if openid.is_empty() {
            return Err(RelayError::BadRequest("Missing required parameter: openid".to_owned()));
        }

        for attempt in 1..=MAX_TOKEN_GENERATION_ATTEMPTS {
            let key = generate();
            if self.store.get(&key).await?.is_some() {
                warn!("generated token collided on attempt {}/{}", attempt, MAX_TOKEN_GENERATION_ATTEMPTS);
                continue;
            }
            self.store.put(&key, openid, None).await?;
            info!("created scoped token for openid {}", openid);
            return Ok(TokenEntry {
                key,
                value: openid.to_owned(),
            });
        }

        Err(RelayError::Internal(format!(
            "could not generate a unique token after {} attempts",
            MAX_TOKEN_GENERATION_ATTEMPTS
        )))
    }

    /// Remove a scoped token. Keys outside the scoped prefix are refused.
    pub async fn delete(&self, key: &str) -> Result<(), RelayError> {
        if key.is_empty() {
            return Err(RelayError::BadRequest("Missing required parameter: key".to_owned()));
        }
        if !is_scoped_token(key) {
            return Err(RelayError::BadRequest(format!(
                "Can only delete user tokens ({}*)",
                SCOPED_TOKEN_PREFIX
            )));
        }
        self.store.delete(key).await?;
        info!("deleted scoped token");
        Ok(())
    }
}

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::credential::Credential;
use crate::errors::RelayError;
use crate::observability::metrics::get_metrics;
use crate::store::SharedStore;
use crate::upstream::UpstreamClient;
use crate::utils::constants::CREDENTIAL_CACHE_KEY;

static READ_MSG: &'static str = "credential_read";
static WRITE_MSG: &'static str = "credential_write";

/// Obtains the upstream credential and keeps it in the store under a fixed key.
///
/// There is no lock around a cache miss: concurrent callers may each issue a
/// credential and overwrite the entry. Any issued credential is usable.
#[derive(Clone)]
pub struct CredentialManager {
    store: SharedStore,
    upstream: UpstreamClient,
    ttl: Duration,
}

impl CredentialManager {
    pub fn new(store: SharedStore, upstream: UpstreamClient, ttl_seconds: u64) -> Self {
        Self {
            store,
            upstream,
            ttl: Duration::from_secs(ttl_seconds),
        }
    }

    /// Cached credential unless `force_refresh`; otherwise a fresh issuance.
    /// Store read and write failures are logged and ignored.
    pub async fn get_credential(&self, force_refresh: bool) -> Result<Credential, RelayError> {
        let metrics = get_metrics().await;

        if !force_refresh {
            match self.store.get(CREDENTIAL_CACHE_KEY).await {
                Ok(Some(value)) if !value.is_empty() => {
                    metrics.credential_cache_hits.inc();
                    return Ok(Credential::cached(value));
                }
                Ok(_) => debug!("credential cache miss"),
                Err(err) => {
                    metrics.store_soft_failures.with_label_values(&[READ_MSG]).inc();
                    warn!("credential cache read failed, requesting new credential: {}", err);
                }
            }
        }

        let response = self.upstream.issue_credential().await?;
        let value = match response.access_token.filter(|token| !token.is_empty()) {
            Some(value) => value,
            None => {
                let errmsg = if response.errmsg.is_empty() {
                    "Unknown error".to_owned()
                } else {
                    response.errmsg
                };
                return Err(RelayError::UpstreamAuth(errmsg));
            }
        };
        metrics.credential_issuances.inc();
        let credential = Credential::issued(value);
        info!(
            "issued upstream credential {}, upstream expires_in {:?}",
            credential.masked(),
            response.expires_in
        );

        if let Err(err) = self
            .store
            .put(CREDENTIAL_CACHE_KEY, &credential.value, Some(self.ttl))
            .await
        {
            metrics.store_soft_failures.with_label_values(&[WRITE_MSG]).inc();
            warn!("credential cache write failed (non-critical): {}", err);
        }

        Ok(credential)
    }

    /// Drop the cached credential so the next call issues a new one.
    pub async fn invalidate(&self) -> Result<(), RelayError> {
        info!("invalidating cached credential");
        self.store.delete(CREDENTIAL_CACHE_KEY).await?;
        Ok(())
    }
}

use tracing::{debug, info, warn};

use crate::cache::credential_cache::CredentialManager;
use crate::config::settings::MessageConfig;
use crate::dispatch::payload::NotificationPayload;
use crate::errors::RelayError;
use crate::observability::metrics::get_metrics;
use crate::upstream::{UpstreamClient, UpstreamResponse};
use crate::utils::constants::ERRCODE_INVALID_CREDENTIAL;

/// Sends template messages upstream. An invalid-credential answer drops the
/// cached credential and is retried once; every other answer is returned as is.
#[derive(Clone)]
pub struct Dispatcher {
    credentials: CredentialManager,
    upstream: UpstreamClient,
    template_id: String,
    message: MessageConfig,
}

impl Dispatcher {
    pub fn new(
        credentials: CredentialManager,
        upstream: UpstreamClient,
        template_id: String,
        message: MessageConfig,
    ) -> Self {
        Self {
            credentials,
            upstream,
            template_id,
            message,
        }
    }

    pub async fn send(&self, payload: &NotificationPayload) -> Result<UpstreamResponse, RelayError> {
        self.send_with(payload, false).await
    }

    /// `is_retry = true` disables the credential refresh for this call.
    pub async fn send_with(
        &self,
        payload: &NotificationPayload,
        is_retry: bool,
    ) -> Result<UpstreamResponse, RelayError> {
        let message = payload.to_template_message(&self.template_id, &self.message);
        let mut is_retry = is_retry;

        loop {
            let credential = self.credentials.get_credential(false).await?;
            debug!(
                "sending template to {} with credential {} ({:?})",
                message.touser,
                credential.masked(),
                credential.source
            );
            let result = self.upstream.send_template(&credential.value, &message).await?;

            if result.errcode == ERRCODE_INVALID_CREDENTIAL && !is_retry {
                warn!("upstream rejected credential ({}), refreshing and retrying once", result.errmsg);
                get_metrics().await.credential_refresh_retries.inc();
                self.credentials.invalidate().await?;
                is_retry = true;
                continue;
            }

            info!(
                "upstream answered errcode {} for {}, msgid {:?}",
                result.errcode, message.touser, result.msgid
            );
            return Ok(result);
        }
    }
}

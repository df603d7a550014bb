use http::header::AUTHORIZATION;
use http::HeaderMap;
use tracing::{debug, error};

use crate::auth::scoped_token::is_scoped_token;
use crate::errors::RelayError;
use crate::store::SharedStore;

const BEARER_PREFIX: &str = "Bearer ";

/// `Authorization` header value with the bearer prefix removed. A header
/// without the prefix is taken whole.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.strip_prefix(BEARER_PREFIX).unwrap_or(value).to_owned())
        .filter(|token| !token.is_empty())
}

/// Resolves the caller token of a `/send` request into the recipient openid.
///
/// Scoped tokens (`sk_...`) are looked up in the store and bind the recipient;
/// anything else must equal the global admin token and the recipient comes
/// from the request.
#[derive(Clone)]
pub struct RequestAuthenticator {
    store: SharedStore,
    admin_token: String,
}

impl RequestAuthenticator {
    pub fn new(store: SharedStore, admin_token: String) -> Self {
        Self { store, admin_token }
    }

    pub async fn authenticate(
        &self,
        request_token: Option<&str>,
        headers: &HeaderMap,
        requested_openid: Option<&str>,
    ) -> Result<String, RelayError> {
        let client_token = request_token
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .or_else(|| bearer_token(headers))
            .ok_or_else(|| RelayError::Unauthorized("Missing token".to_owned()))?;

        let openid = if is_scoped_token(&client_token) {
            debug!("looking up scoped token");
            let stored = self.store.get(&client_token).await.map_err(|err| {
                error!("token database access failed: {}", err);
                RelayError::Internal(format!("Failed to access token database - {}", err))
            })?;
            stored
                .filter(|openid| !openid.is_empty())
                .ok_or_else(|| RelayError::Unauthorized("Token not found in database".to_owned()))?
        } else {
            if client_token != self.admin_token {
                return Err(RelayError::Unauthorized("Invalid global token".to_owned()));
            }
            requested_openid.unwrap_or_default().to_owned()
        };

        if openid.is_empty() {
            return Err(RelayError::BadRequest("Missing required parameter: openid".to_owned()));
        }
        Ok(openid)
    }

    /// Admin API guard: bearer header must equal the admin token.
    pub fn authorize_admin(&self, headers: &HeaderMap) -> Result<(), RelayError> {
        match bearer_token(headers) {
            Some(token) if token == self.admin_token => Ok(()),
            _ => Err(RelayError::Unauthorized("Invalid admin token".to_owned())),
        }
    }
}

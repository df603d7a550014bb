use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;
use crate::utils::constants::ERRCODE_RELAY_FAILURE;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Method not allowed. Use GET or POST")]
    MethodNotAllowed,

    #[error("Failed to get access token: {0}")]
    UpstreamAuth(String),

    #[error("upstream rejected message: {errcode} {errmsg}")]
    UpstreamDispatch { errcode: i64, errmsg: String },

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    NotFound(String),

    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Internal(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::NotFound(_) => StatusCode::NOT_FOUND,
            RelayError::UpstreamAuth(_)
            | RelayError::UpstreamDispatch { .. }
            | RelayError::Store(_)
            | RelayError::Http(_)
            | RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Server-side failures get a `Server error:` prefix.
    pub fn public_message(&self) -> String {
        match self.status() {
            StatusCode::INTERNAL_SERVER_ERROR => format!("Server error: {}", self),
            _ => self.to_string(),
        }
    }
}

/// `/send` error body: `{errcode: -1, errmsg}`.
impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("send failed: {}", self);
        }
        let body = match &self {
            // upstream answer passed through
            RelayError::UpstreamDispatch { errcode, errmsg } => json!({
                "errcode": errcode,
                "errmsg": errmsg,
            }),
            _ => json!({
                "errcode": ERRCODE_RELAY_FAILURE,
                "errmsg": self.public_message(),
            }),
        };
        (status, Json(body)).into_response()
    }
}

/// Admin API error body: `{error}` plus optional `details`.
#[derive(Debug)]
pub struct AdminError {
    pub error: RelayError,
    pub summary: Option<&'static str>,
}

impl AdminError {
    /// Replace the message with a fixed summary and move the cause into `details`.
    pub fn summarized(error: RelayError, summary: &'static str) -> Self {
        Self {
            error,
            summary: Some(summary),
        }
    }
}

impl From<RelayError> for AdminError {
    fn from(error: RelayError) -> Self {
        Self {
            error,
            summary: None,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.error.status();
        if status.is_server_error() {
            error!("admin api failed: {}", self.error);
        }
        let body = match self.summary {
            Some(summary) => json!({
                "error": summary,
                "details": self.error.to_string(),
            }),
            None => json!({ "error": self.error.public_message() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Startup configuration problems. Reported before the server binds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("missing required setting '{0}'")]
    Missing(&'static str),

    #[error("store '{0}' of type redis requires 'store.url'")]
    StoreUrlMissing(String),

    #[error("setting '{0}' must be greater than zero")]
    NotPositive(&'static str),
}

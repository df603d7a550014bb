use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::{HeaderMap, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tokio::time::Instant;
use tracing::info;

use crate::dispatch::NotificationPayload;
use crate::errors::RelayError;
use crate::observability::metrics::get_metrics;
use crate::server::server::AppState;
use crate::upstream::UpstreamResponse;
use crate::utils::constants::ERRCODE_RELAY_FAILURE;

static OK_MSG: &'static str = "ok";
static UPSTREAM_MSG: &'static str = "upstream_error";
static REJECTED_MSG: &'static str = "rejected";

/// `/send` input, from the query string (GET) or a JSON body (POST)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SendParams {
    pub token: Option<String>,
    pub openid: Option<String>,
    pub from: Option<String>,
    pub desc: Option<String>,
    pub remark: Option<String>,
    pub url: Option<String>,
}

impl SendParams {
    /// First occurrence wins when a query parameter is repeated.
    fn from_query(pairs: &[(String, String)]) -> Self {
        Self {
            token: first_value(pairs, "token"),
            openid: first_value(pairs, "openid"),
            from: first_value(pairs, "from"),
            desc: first_value(pairs, "desc"),
            remark: first_value(pairs, "remark"),
            url: first_value(pairs, "url"),
        }
    }
}

pub fn first_value(pairs: &[(String, String)], name: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
}

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/send",
        get(send_get).post(send_post).fallback(method_not_allowed),
    )
}

async fn send_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    handle_send(&state, &headers, SendParams::from_query(&query), "GET").await
}

async fn send_post(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let params = match serde_json::from_slice::<SendParams>(&body) {
        Ok(params) => params,
        Err(err) => {
            return RelayError::BadRequest(format!("Invalid JSON body: {}", err)).into_response()
        }
    };
    handle_send(&state, &headers, params, "POST").await
}

async fn handle_send(state: &AppState, headers: &HeaderMap, params: SendParams, method: &str) -> Response {
    let metrics = get_metrics().await;
    let start = Instant::now();

    let response = match relay(state, headers, params).await {
        Ok(result) => {
            metrics.send_requests.with_label_values(&[OK_MSG]).inc();
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(err @ RelayError::UpstreamDispatch { .. }) => {
            metrics.send_requests.with_label_values(&[UPSTREAM_MSG]).inc();
            err.into_response()
        }
        Err(err) => {
            metrics.send_requests.with_label_values(&[REJECTED_MSG]).inc();
            err.into_response()
        }
    };

    metrics
        .send_duration
        .with_label_values(&[method])
        .observe(start.elapsed().as_secs_f64());
    response
}

async fn relay(state: &AppState, headers: &HeaderMap, params: SendParams) -> Result<UpstreamResponse, RelayError> {
    let openid = state
        .authenticator
        .authenticate(params.token.as_deref(), headers, params.openid.as_deref())
        .await?;

    let payload = NotificationPayload {
        openid,
        from: params.from,
        desc: params.desc,
        remark: params.remark,
        url: params.url,
    };
    let result = state.dispatcher.send(&payload).await?;
    if !result.is_success() {
        info!("upstream error {}: {}", result.errcode, result.errmsg);
        return Err(RelayError::UpstreamDispatch {
            errcode: result.errcode,
            errmsg: result.errmsg,
        });
    }
    Ok(result)
}

async fn method_not_allowed() -> Response {
    RelayError::MethodNotAllowed.into_response()
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "errcode": ERRCODE_RELAY_FAILURE,
            "errmsg": "Not found. Use / for homepage or /send for message sending",
        })),
    )
        .into_response()
}

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use http::HeaderMap;
use serde::Deserialize;
use serde_json::json;

use crate::errors::{AdminError, RelayError};
use crate::observability::metrics::get_metrics;
use crate::server::routes_send::first_value;
use crate::server::server::AppState;

static LIST_MSG: &'static str = "list";
static CREATE_MSG: &'static str = "create";
static DELETE_MSG: &'static str = "delete";

#[derive(Debug, Deserialize)]
struct CreateTokenRequest {
    openid: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/api/tokens",
            get(list_tokens)
                .post(create_token)
                .delete(delete_token)
                .fallback(endpoint_not_found),
        )
        .route("/admin/api/{*rest}", any(endpoint_not_found))
}

async fn record(operation: &str, is_ok: bool) {
    let outcome = if is_ok { "ok" } else { "error" };
    get_metrics()
        .await
        .admin_operations
        .with_label_values(&[operation, outcome])
        .inc();
}

async fn list_tokens(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AdminError> {
    let result = async {
        state.authenticator.authorize_admin(&headers)?;
        let tokens = state
            .registry
            .list()
            .await
            .map_err(|err| AdminError::summarized(err, "Failed to list tokens"))?;
        Ok::<Response, AdminError>(Json(json!({ "tokens": tokens })).into_response())
    }
    .await;
    record(LIST_MSG, result.is_ok()).await;
    result
}

async fn create_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AdminError> {
    let result = async {
        state.authenticator.authorize_admin(&headers)?;
        let request: CreateTokenRequest = serde_json::from_slice(&body)
            .map_err(|err| RelayError::BadRequest(format!("Invalid JSON body: {}", err)))?;
        let openid = request.openid.unwrap_or_default();
        let entry = state.registry.create(&openid).await?;
        Ok::<Response, AdminError>(Json(json!({
            "success": true,
            "key": entry.key,
            "value": entry.value,
        }))
        .into_response())
    }
    .await;
    record(CREATE_MSG, result.is_ok()).await;
    result
}

async fn delete_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<Vec<(String, String)>>,
) -> Result<Response, AdminError> {
    let result = async {
        state.authenticator.authorize_admin(&headers)?;
        let key = first_value(&query, "key").unwrap_or_default();
        state.registry.delete(&key).await?;
        Ok::<Response, AdminError>(Json(json!({
            "success": true,
            "message": "Token deleted successfully",
        }))
        .into_response())
    }
    .await;
    record(DELETE_MSG, result.is_ok()).await;
    result
}

/// Unknown admin endpoints still require the admin token.
async fn endpoint_not_found(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, AdminError> {
    state.authenticator.authorize_admin(&headers)?;
    Err(RelayError::NotFound("API endpoint not found".to_owned()).into())
}

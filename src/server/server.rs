use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use reqwest::Client;
use tracing::info;

use crate::auth::RequestAuthenticator;
use crate::cache::credential_cache::CredentialManager;
use crate::config::settings::ServiceConfig;
use crate::dispatch::Dispatcher;
use crate::observability::metrics::get_metrics;
use crate::observability::routes::MetricsState;
use crate::registry::TokenRegistry;
use crate::server::{pages, routes_admin, routes_send};
use crate::store::SharedStore;
use crate::upstream::UpstreamClient;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub authenticator: Arc<RequestAuthenticator>,
    pub dispatcher: Arc<Dispatcher>,
    pub registry: Arc<TokenRegistry>,
}

impl AppState {
    pub async fn new(config: &ServiceConfig, store: SharedStore, client: Client) -> Self {
        let metrics = get_metrics().await;
        let upstream = UpstreamClient::new(client, &config.upstream);
        let credentials = CredentialManager::new(
            store.clone(),
            upstream.clone(),
            config.upstream.credential_ttl_seconds,
        );

        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            authenticator: Arc::new(RequestAuthenticator::new(
                store.clone(),
                config.auth.admin_token.clone(),
            )),
            dispatcher: Arc::new(Dispatcher::new(
                credentials,
                upstream,
                config.upstream.template_id.clone(),
                config.message.clone(),
            )),
            registry: Arc::new(TokenRegistry::new(store, config.store.list_page_size)),
        }
    }
}

/// Full inbound surface: pages, `/send`, admin API and, when enabled, metrics.
pub fn router(config: &ServiceConfig, state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index_page))
        .route("/admin", get(pages::admin_page))
        .merge(routes_send::router())
        .merge(routes_admin::router())
        .merge(state.metrics_state.router(&config.settings.metrics))
        .fallback(routes_send::not_found)
        .with_state(state)
}

/// Bind the configured address and serve until the process stops.
pub async fn start(config: &ServiceConfig, store: SharedStore, client: Client) -> Result<()> {
    let state = AppState::new(config, store, client).await;
    let app = router(config, state);

    let bind_addr = format!("{}:{}", config.settings.server.host, config.settings.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("listening on {}", bind_addr);

    get_metrics().await.up.set(1);
    axum::serve(listener, app).await.context("http server failed")?;
    Ok(())
}

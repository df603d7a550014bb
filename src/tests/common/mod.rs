// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::Json;
use reqwest::Client;
use serde_json::Value;

use crate::config::settings::{
    AuthConfig, LogFormat, LoggingConfig, MessageConfig, MetricsConfig, ServerConfig,
    ServiceConfig, SettingsConfig, StoreConfig, StoreType, UpstreamConfig,
};
use crate::server::server::{router, AppState};
use crate::store::{KvStore, ListOptions, ListPage, SharedStore, StoreError};

pub const ADMIN_TOKEN: &str = "admin-secret";
pub const TEMPLATE_ID: &str = "tpl-test";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

pub fn test_service_config(upstream_base_url: &str) -> ServiceConfig {
    ServiceConfig {
        settings: SettingsConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_owned(),
                port: "0".to_owned(),
            },
            metrics: MetricsConfig {
                path: "/metrics".to_owned(),
                is_enabled: true,
            },
            logging: Some(LoggingConfig::new("debug".to_owned(), LogFormat::Compact)),
        },
        upstream: UpstreamConfig {
            base_url: upstream_base_url.to_owned(),
            app_id: "wx-test-app".to_owned(),
            app_secret: "wx-test-secret".to_owned(),
            template_id: TEMPLATE_ID.to_owned(),
            credential_ttl_seconds: 7000,
        },
        auth: AuthConfig {
            admin_token: ADMIN_TOKEN.to_owned(),
        },
        store: StoreConfig {
            store_type: StoreType::Memory,
            name: "WECHAT_KV".to_owned(),
            url: None,
            list_page_size: 2,
        },
        message: MessageConfig::default(),
    }
}

/// Relay under test on an ephemeral port
pub async fn spawn_relay(config: &ServiceConfig, store: SharedStore) -> (JoinHandle<()>, SocketAddr) {
    let state = AppState::new(config, store, build_reqwest_client()).await;
    spawn_axum(router(config, state)).await
}

/// Store whose every call fails
pub struct BrokenStore;

#[async_trait]
impl KvStore for BrokenStore {
    async fn get(&self, _: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::Backend("connection reset".to_owned()))
    }
    async fn put(&self, _: &str, _: &str, _: Option<Duration>) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection reset".to_owned()))
    }
    async fn delete(&self, _: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("connection reset".to_owned()))
    }
    async fn list(&self, _: ListOptions) -> Result<ListPage, StoreError> {
        Err(StoreError::Backend("connection reset".to_owned()))
    }
}

// -------------------------------
// Mock upstream messaging API
// -------------------------------

#[derive(Debug, Clone)]
pub struct SentMessage {
    pub access_token: String,
    pub body: Value,
}

type Responder = Arc<dyn Fn(&str, usize) -> Value + Send + Sync>;

#[derive(Clone)]
struct MockState {
    issued: Arc<AtomicUsize>,
    sent: Arc<Mutex<Vec<SentMessage>>>,
    responder: Responder,
}

/// Issues `cred-1`, `cred-2`, ... and answers sends with `responder(access_token, send_index)`.
pub struct MockUpstream {
    pub base_url: String,
    pub handle: JoinHandle<()>,
    issued: Arc<AtomicUsize>,
    sent: Arc<Mutex<Vec<SentMessage>>>,
}

impl MockUpstream {
    pub fn issued(&self) -> usize {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

pub fn ok_response(msgid: i64) -> Value {
    json!({"errcode": 0, "errmsg": "ok", "msgid": msgid})
}

pub fn error_response(errcode: i64, errmsg: &str) -> Value {
    json!({"errcode": errcode, "errmsg": errmsg})
}

pub async fn spawn_mock_upstream<F>(responder: F) -> MockUpstream
where
    F: Fn(&str, usize) -> Value + Send + Sync + 'static,
{
    let state = MockState {
        issued: Arc::new(AtomicUsize::new(0)),
        sent: Arc::new(Mutex::new(Vec::new())),
        responder: Arc::new(responder),
    };
    let issued = state.issued.clone();
    let sent = state.sent.clone();

    let app = Router::new()
        .route("/cgi-bin/token", get(mock_issue))
        .route("/cgi-bin/message/template/send", post(mock_send))
        .with_state(state);
    let (handle, addr) = spawn_axum(app).await;

    MockUpstream {
        base_url: format!("http://{}", addr),
        handle,
        issued,
        sent,
    }
}

async fn mock_issue(State(state): State<MockState>) -> Json<Value> {
    let n = state.issued.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({"access_token": format!("cred-{}", n), "expires_in": 7200}))
}

async fn mock_send(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let access_token = query.get("access_token").cloned().unwrap_or_default();
    let index = {
        let mut sent = state.sent.lock().unwrap();
        sent.push(SentMessage {
            access_token: access_token.clone(),
            body,
        });
        sent.len() - 1
    };
    Json((state.responder)(&access_token, index))
}

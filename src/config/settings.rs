use serde::Deserialize;

use crate::utils::constants::{
    DEFAULT_CREDENTIAL_TTL_SECONDS, DEFAULT_LIST_PAGE_SIZE, DEFAULT_UPSTREAM_BASE_URL,
};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub upstream: UpstreamConfig,
    pub auth: AuthConfig,
    pub store: StoreConfig,
    #[serde(default)]
    pub message: MessageConfig,
}

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct SettingsConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_path")]
    pub path: String,
    #[serde(default)]
    pub is_enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            is_enabled: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: String,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

/// ================================
/// Upstream messaging API
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,
    pub app_id: String,
    pub app_secret: String,
    pub template_id: String,
    /// must stay below the upstream validity window (7200s)
    #[serde(default = "default_credential_ttl_seconds")]
    pub credential_ttl_seconds: u64,
}

/// ================================
/// Caller authentication
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// global token for `/send` and bearer secret for the admin API
    pub admin_token: String,
}

/// ================================
/// Key-value store
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(rename = "type")]
    pub store_type: StoreType,
    /// logical namespace; used as the key prefix on shared backends
    pub name: String,
    pub url: Option<String>,
    #[serde(default = "default_list_page_size")]
    pub list_page_size: usize,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    Memory,
    Redis,
}

/// ================================
/// Outgoing message defaults
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MessageConfig {
    #[serde(default)]
    pub defaults: MessageDefaults,
    #[serde(default)]
    pub colors: MessageColors,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MessageDefaults {
    pub from: Option<String>,
    pub desc: Option<String>,
    pub remark: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MessageColors {
    pub from: Option<String>,
    pub desc: Option<String>,
    pub remark: Option<String>,
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_upstream_base_url() -> String {
    DEFAULT_UPSTREAM_BASE_URL.to_string()
}

fn default_credential_ttl_seconds() -> u64 {
    DEFAULT_CREDENTIAL_TTL_SECONDS
}

fn default_list_page_size() -> usize {
    DEFAULT_LIST_PAGE_SIZE
}

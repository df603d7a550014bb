//! Shared constants and invariants

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.weixin.qq.com";

/// Cache TTL for the upstream credential, kept below the 7200s upstream window.
pub const DEFAULT_CREDENTIAL_TTL_SECONDS: u64 = 7000;
pub const DEFAULT_LIST_PAGE_SIZE: usize = 1000;

/// Store key holding the cached upstream credential.
pub const CREDENTIAL_CACHE_KEY: &str = "access_token";

/// Scoped tokens
pub const SCOPED_TOKEN_PREFIX: &str = "sk_";
pub const SCOPED_TOKEN_SUFFIX_LEN: usize = 16;
pub const MAX_TOKEN_GENERATION_ATTEMPTS: usize = 5;

/// Upstream error code for an expired or invalid credential.
pub const ERRCODE_INVALID_CREDENTIAL: i64 = 40001;
/// errcode used by the relay itself in `/send` error bodies
pub const ERRCODE_RELAY_FAILURE: i64 = -1;

// Message fallbacks applied after request values and configured defaults
pub const FALLBACK_FROM: &str = "系统通知";
pub const FALLBACK_DESC: &str = "无内容";
pub const FALLBACK_REMARK: &str = "";
pub const FALLBACK_URL: &str = "";

pub const COLOR_FROM: &str = "#173177";
pub const COLOR_DESC: &str = "#000000";
pub const COLOR_REMARK: &str = "#888888";

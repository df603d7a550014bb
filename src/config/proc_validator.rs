use tracing::error;

use crate::config::settings::{ServiceConfig, StoreType};
use crate::errors::ConfigurationError;

/// Fail fast on settings the relay cannot run without.
pub fn validate_service_config(config: &ServiceConfig) -> Result<(), ConfigurationError> {
    let result = validate(config);
    if let Err(err) = &result {
        error!("config validation failed: {}", err);
    }
    result
}

fn validate(config: &ServiceConfig) -> Result<(), ConfigurationError> {
    require(&config.upstream.base_url, "upstream.base_url")?;
    require(&config.upstream.app_id, "upstream.app_id")?;
    require(&config.upstream.app_secret, "upstream.app_secret")?;
    require(&config.upstream.template_id, "upstream.template_id")?;
    require(&config.auth.admin_token, "auth.admin_token")?;
    require(&config.store.name, "store.name")?;

    if config.upstream.credential_ttl_seconds == 0 {
        return Err(ConfigurationError::NotPositive("upstream.credential_ttl_seconds"));
    }
    if config.store.list_page_size == 0 {
        return Err(ConfigurationError::NotPositive("store.list_page_size"));
    }
    if config.store.store_type == StoreType::Redis
        && config.store.url.as_deref().map(str::trim).unwrap_or_default().is_empty()
    {
        return Err(ConfigurationError::StoreUrlMissing(config.store.name.clone()));
    }
    Ok(())
}

fn require(value: &str, name: &'static str) -> Result<(), ConfigurationError> {
    if value.trim().is_empty() {
        return Err(ConfigurationError::Missing(name));
    }
    Ok(())
}

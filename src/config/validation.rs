use crate::config::types::{CrawlerSettings, Settings};
use crate::ConfigError;
use url::Url;

/// Validates merged settings before a job is built
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    validate_crawler_settings(&settings.crawler)?;
    Ok(())
}

/// Validates crawler settings
fn validate_crawler_settings(config: &CrawlerSettings) -> Result<(), ConfigError> {
    // depth >= 0 is always true for u32, so no check needed

    if config.threads < 1 {
        return Err(ConfigError::Validation(format!(
            "threads must be >= 1, got {}",
            config.threads
        )));
    }

    if config.size != -1 && config.size < 1 {
        return Err(ConfigError::Validation(format!(
            "size must be -1 (unlimited) or a positive number of KB, got {}",
            config.size
        )));
    }

    let size_bytes = usize::try_from(config.size)
        .ok()
        .and_then(|kb| kb.checked_mul(1024));
    if config.size > 0 && size_bytes.is_none() {
        return Err(ConfigError::Validation(format!(
            "size {} KB does not fit in memory",
            config.size
        )));
    }

    if config.timeout != -1 && config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be -1 (unbounded) or a positive number of seconds, got {}",
            config.timeout
        )));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(
            "request-timeout must be >= 1 second".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if let Some(proxy) = config.proxy.as_deref().filter(|p| !p.is_empty()) {
        validate_proxy(proxy)?;
    }

    Ok(())
}

/// Validates the proxy URL
fn validate_proxy(proxy: &str) -> Result<(), ConfigError> {
    let url = Url::parse(proxy)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid proxy '{}': {}", proxy, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Proxy '{}' must use the http or https scheme",
            proxy
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Proxy '{}' has no host",
            proxy
        )));
    }

    Ok(())
}

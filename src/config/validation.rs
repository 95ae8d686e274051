use crate::config::types::{Config, CrawlConfig, OutputConfig, SearchConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawl_config(&config.crawl)?;
    validate_search_config(&config.search)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl tunables
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_per_keyword < 1 {
        return Err(ConfigError::Validation(format!(
            "max_per_keyword must be >= 1, got {}",
            config.max_per_keyword
        )));
    }

    if config.delay_min_secs < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay_min_secs must be >= 0, got {}",
            config.delay_min_secs
        )));
    }

    if config.delay_max_secs < config.delay_min_secs {
        return Err(ConfigError::Validation(format!(
            "delay_max_secs ({}) must be >= delay_min_secs ({})",
            config.delay_max_secs, config.delay_min_secs
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates the search endpoint configuration
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&config.endpoint).map_err(|e| {
        ConfigError::Validation(format!("Invalid search endpoint '{}': {}", config.endpoint, e))
    })?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Search endpoint must be http(s), got '{}'",
            config.endpoint
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output paths
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.image_root.is_empty() {
        return Err(ConfigError::Validation(
            "image_root cannot be empty".to_string(),
        ));
    }

    if config.metadata_path.is_empty() {
        return Err(ConfigError::Validation(
            "metadata_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

use crate::config::types::{Config, CrawlerConfig, UserAgentConfig, SEARCH_LIMIT};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    config.transliteration_table()?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 || config.max_pages > SEARCH_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and {}, got {}",
            SEARCH_LIMIT, config.max_pages
        )));
    }

    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 100, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.frontier_backoff_ms == 0 {
        return Err(ConfigError::Validation(
            "frontier_backoff_ms must be >= 1".to_string(),
        ));
    }

    if config.frontier_backoff_ms > config.frontier_max_backoff_ms {
        return Err(ConfigError::Validation(format!(
            "frontier_backoff_ms ({}) cannot exceed frontier_max_backoff_ms ({})",
            config.frontier_backoff_ms, config.frontier_max_backoff_ms
        )));
    }

    if !config.relevance_multiplier.is_finite() || config.relevance_multiplier <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "relevance_multiplier must be a positive number, got {}",
            config.relevance_multiplier
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    if let Some(contact_email) = &config.contact_email {
        validate_email(contact_email)?;
    }

    Ok(())
}

/// Performs basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.contains('@')
        }
        None => false,
    };

    if !valid {
        return Err(ConfigError::Validation(format!(
            "Invalid email address: '{}'",
            email
        )));
    }

    Ok(())
}

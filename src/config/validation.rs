//! Semantic configuration validation.
//!
//! Serde handles the syntax; this pass checks value ranges and
//! referential sanity, and reports every problem it finds.

use thiserror::Error;
use url::Url;

use crate::config::schema::HubConfig;

/// One semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),
    #[error("listener request timeout must be greater than zero")]
    ZeroRequestTimeout,
    #[error("sampling interval must be greater than zero")]
    ZeroSamplingInterval,
    #[error("retention window must be greater than zero")]
    ZeroRetention,
    #[error("retention window must not be shorter than the sampling interval")]
    RetentionShorterThanInterval,
    #[error("live buffer size must be greater than zero")]
    ZeroLiveBuffer,
    #[error("health timeout must be greater than zero")]
    ZeroHealthTimeout,
    #[error("duplicate dependency name '{0}'")]
    DuplicateDependency(String),
    #[error("dependency '{name}' has invalid endpoint '{endpoint}'")]
    InvalidEndpoint { name: String, endpoint: String },
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &HubConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config
        .listener
        .bind_address
        .parse::<std::net::SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.sampling.interval_secs == 0 {
        errors.push(ValidationError::ZeroSamplingInterval);
    }
    if config.sampling.retention_secs == 0 {
        errors.push(ValidationError::ZeroRetention);
    } else if config.sampling.retention_secs < config.sampling.interval_secs {
        errors.push(ValidationError::RetentionShorterThanInterval);
    }

    if config.live.buffer_size == 0 {
        errors.push(ValidationError::ZeroLiveBuffer);
    }

    if config.health.timeout_secs == 0 {
        errors.push(ValidationError::ZeroHealthTimeout);
    }
    let mut seen = std::collections::HashSet::new();
    for dependency in &config.health.dependencies {
        if !seen.insert(dependency.name.as_str()) {
            errors.push(ValidationError::DuplicateDependency(
                dependency.name.clone(),
            ));
        }
        let scheme_ok = Url::parse(&dependency.endpoint)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !scheme_ok {
            errors.push(ValidationError::InvalidEndpoint {
                name: dependency.name.clone(),
                endpoint: dependency.endpoint.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

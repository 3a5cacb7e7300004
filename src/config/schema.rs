//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the hub.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the metrics hub.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HubConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Sampling loop and retention settings.
    pub sampling: SamplingConfig,

    /// Live channel settings.
    pub live: LiveConfig,

    /// Dependency health check settings.
    pub health: HealthConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9090").
    pub bind_address: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9090".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Sampling loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Seconds between sampling cycles.
    pub interval_secs: u64,

    /// Wall-clock retention window for stored points, in seconds.
    pub retention_secs: u64,
}

impl SamplingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            retention_secs: 3600,
        }
    }
}

/// Live channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Outbound queue depth per subscriber. A subscriber that falls this
    /// far behind is disconnected.
    pub buffer_size: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self { buffer_size: 16 }
    }
}

/// Dependency health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Per-dependency probe timeout in seconds.
    pub timeout_secs: u64,

    /// Dependencies to probe, in report order.
    pub dependencies: Vec<DependencyConfig>,
}

impl HealthConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 2,
            dependencies: Vec::new(),
        }
    }
}

/// One dependency to health check.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DependencyConfig {
    /// Name used in reports and logs.
    pub name: String,

    /// Full health endpoint URL (e.g., "http://orders:8080/health").
    pub endpoint: String,

    /// A critical dependency failing makes the whole service Unhealthy;
    /// a non-critical one only degrades it.
    #[serde(default = "default_critical")]
    pub critical: bool,
}

fn default_critical() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = HubConfig::default();
        assert_eq!(config.sampling.interval(), Duration::from_secs(5));
        assert_eq!(config.sampling.retention(), Duration::from_secs(3600));
        assert!(config.health.dependencies.is_empty());
        assert_eq!(config.live.buffer_size, 16);
    }

    #[test]
    fn test_minimal_toml_round_trip() {
        let config: HubConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:9100"

            [[health.dependencies]]
            name = "orders"
            endpoint = "http://localhost:8081/health"

            [[health.dependencies]]
            name = "cache"
            endpoint = "http://localhost:8082/health"
            critical = false
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9100");
        assert_eq!(config.health.dependencies.len(), 2);
        assert!(config.health.dependencies[0].critical); // defaults to critical
        assert!(!config.health.dependencies[1].critical);
    }
}

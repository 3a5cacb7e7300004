//! Concurrent dependency probing.

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::Request;
use futures_util::future::join_all;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;

use crate::config::DependencyConfig;
use crate::health::verdict::{DependencyCheck, HealthStatus, HealthVerdict};

/// Probes a configured set of dependency health endpoints.
///
/// All probes run concurrently and each is independently bounded by the
/// timeout, so a full sweep costs one timeout, not one per dependency.
pub struct HealthAggregator {
    dependencies: Vec<DependencyConfig>,
    timeout: Duration,
    client: Client<HttpConnector, Body>,
}

impl HealthAggregator {
    pub fn new(dependencies: Vec<DependencyConfig>, timeout: Duration) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            dependencies,
            timeout,
            client,
        }
    }

    /// Probe every dependency and compose the overall verdict.
    pub async fn check_all(&self) -> HealthVerdict {
        let started = Instant::now();
        let checks = self.check_dependencies().await;
        HealthVerdict::compose(checks, started.elapsed().as_millis() as u64)
    }

    /// Probe every dependency concurrently, in configuration order.
    pub async fn check_dependencies(&self) -> Vec<DependencyCheck> {
        join_all(
            self.dependencies
                .iter()
                .map(|dependency| self.check_one(dependency)),
        )
        .await
    }

    async fn check_one(&self, dependency: &DependencyConfig) -> DependencyCheck {
        let started = Instant::now();

        let request = match Request::builder()
            .method("GET")
            .uri(dependency.endpoint.as_str())
            .header("user-agent", "metrics-hub-health-check")
            .body(Body::empty())
        {
            Ok(request) => request,
            Err(e) => {
                return DependencyCheck {
                    name: dependency.name.clone(),
                    status: HealthStatus::Unhealthy,
                    description: format!("invalid endpoint: {}", e),
                    duration_ms: started.elapsed().as_millis() as u64,
                    critical: dependency.critical,
                };
            }
        };

        let outcome = time::timeout(self.timeout, self.client.request(request)).await;
        let (status, description) = match outcome {
            Ok(Ok(response)) if response.status().is_success() => (
                HealthStatus::Healthy,
                format!("HTTP {}", response.status().as_u16()),
            ),
            Ok(Ok(response)) => {
                tracing::warn!(
                    dependency = %dependency.name,
                    status = %response.status(),
                    "Health check failed: non-success status"
                );
                (
                    HealthStatus::Unhealthy,
                    format!("HTTP {}", response.status().as_u16()),
                )
            }
            Ok(Err(e)) => {
                tracing::warn!(dependency = %dependency.name, error = %e, "Health check failed: connection error");
                (HealthStatus::Unhealthy, format!("connection error: {}", e))
            }
            Err(_) => {
                tracing::warn!(dependency = %dependency.name, timeout_ms = self.timeout.as_millis() as u64, "Health check failed: timeout");
                (
                    HealthStatus::Unhealthy,
                    format!("timed out after {}ms", self.timeout.as_millis()),
                )
            }
        };

        DependencyCheck {
            name: dependency.name.clone(),
            status,
            description,
            duration_ms: started.elapsed().as_millis() as u64,
            critical: dependency.critical,
        }
    }
}

//! Health verdict types and composition rules.

use serde::Serialize;

/// Status of one dependency or of the service as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Outcome of probing a single dependency.
#[derive(Debug, Clone, Serialize)]
pub struct DependencyCheck {
    pub name: String,
    pub status: HealthStatus,
    pub description: String,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
    #[serde(skip)]
    pub critical: bool,
}

/// Composite verdict across all checks.
#[derive(Debug, Clone, Serialize)]
pub struct HealthVerdict {
    pub status: HealthStatus,
    pub checks: Vec<DependencyCheck>,
    #[serde(rename = "totalDurationMs")]
    pub total_duration_ms: u64,
}

impl HealthVerdict {
    /// Healthy iff every check passed; Unhealthy if any critical check
    /// failed; Degraded when only non-critical checks failed.
    pub fn compose(checks: Vec<DependencyCheck>, total_duration_ms: u64) -> Self {
        let critical_failure = checks
            .iter()
            .any(|check| check.critical && check.status != HealthStatus::Healthy);
        let any_failure = checks
            .iter()
            .any(|check| check.status != HealthStatus::Healthy);

        let status = if critical_failure {
            HealthStatus::Unhealthy
        } else if any_failure {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        Self {
            status,
            checks,
            total_duration_ms,
        }
    }
}

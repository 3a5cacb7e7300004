//! A single sample in a metric series.

use serde::Serialize;

use crate::registry::Labels;

/// Immutable timestamped sample. Owned by the series it was appended to.
#[derive(Debug, Clone, Serialize)]
pub struct MetricPoint {
    pub name: String,
    pub timestamp_ms: u64,
    pub value: f64,
    #[serde(skip_serializing_if = "Labels::is_empty")]
    pub labels: Labels,
}

impl MetricPoint {
    pub fn new(name: &str, value: f64, labels: Labels, timestamp_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            timestamp_ms,
            value,
            labels,
        }
    }
}

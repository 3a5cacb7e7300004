//! Event payloads pushed on the live channel.

use serde::Serialize;

use crate::registry::RegistrySnapshot;
use crate::sampler::SystemSnapshot;

/// Everything a dashboard needs to repaint: the latest system sample plus
/// the current registry view.
#[derive(Debug, Clone, Serialize)]
pub struct CombinedSnapshot {
    pub timestamp_ms: u64,
    pub system: SystemSnapshot,
    pub registry: RegistrySnapshot,
}

/// Named events delivered to live subscribers as JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data")]
pub enum LiveEvent {
    /// Full periodic snapshot, published once per sampling cycle.
    MetricsUpdate(CombinedSnapshot),
    /// Single-metric delta, published when a counter moves.
    MetricUpdated {
        name: String,
        value: f64,
        timestamp_ms: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_event_tag() {
        let event = LiveEvent::MetricUpdated {
            name: "http_requests_total".to_string(),
            value: 5.0,
            timestamp_ms: 123,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "MetricUpdated");
        assert_eq!(json["data"]["name"], "http_requests_total");
        assert_eq!(json["data"]["value"], 5.0);
    }
}

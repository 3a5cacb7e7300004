//! Bounded-retention store of per-name metric series.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;

use crate::registry::Labels;
use crate::store::point::MetricPoint;
use crate::store::series::{SeriesBuffer, SeriesSummary};
use crate::store::unix_millis_now;

/// Append-only time-series log with wall-clock retention.
///
/// Each name owns an independent series behind its own mutex; appends and
/// queries on unrelated names never contend. Purging happens lazily on
/// append and query, so no caller observes a point older than the
/// retention window once that window has elapsed.
pub struct TimeSeriesStore {
    series: DashMap<String, Arc<Mutex<SeriesBuffer>>>,
    retention_ms: u64,
}

impl TimeSeriesStore {
    pub fn new(retention: Duration) -> Self {
        Self {
            series: DashMap::new(),
            retention_ms: retention.as_millis() as u64,
        }
    }

    pub fn retention(&self) -> Duration {
        Duration::from_millis(self.retention_ms)
    }

    /// Append a point stamped with the current wall clock.
    pub fn append(&self, name: &str, value: f64, labels: Labels) {
        self.append_at(name, value, labels, unix_millis_now());
    }

    /// Append a point with an explicit timestamp.
    pub fn append_at(&self, name: &str, value: f64, labels: Labels, timestamp_ms: u64) {
        let buffer = self.buffer(name);
        let now_ms = unix_millis_now().max(timestamp_ms);
        let point = MetricPoint::new(name, value, labels, timestamp_ms);
        let mut buffer = buffer.lock().unwrap();
        buffer.append(point, self.retention_ms, now_ms);
    }

    /// Points currently inside the retention window, in timestamp order.
    pub fn query(&self, name: &str) -> Vec<MetricPoint> {
        let Some(buffer) = self.series.get(name).map(|entry| entry.value().clone()) else {
            return Vec::new();
        };
        let mut buffer = buffer.lock().unwrap();
        buffer.purge(self.retention_ms, unix_millis_now());
        buffer.points().cloned().collect()
    }

    /// Per-name aggregates over the retained window. Names whose window
    /// is empty after purging are omitted.
    pub fn summaries(&self) -> HashMap<String, SeriesSummary> {
        let now_ms = unix_millis_now();
        let mut out = HashMap::new();
        for entry in self.series.iter() {
            let mut buffer = entry.value().lock().unwrap();
            buffer.purge(self.retention_ms, now_ms);
            if let Some(summary) = buffer.summary() {
                out.insert(entry.key().clone(), summary);
            }
        }
        out
    }

    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    fn buffer(&self, name: &str) -> Arc<Mutex<SeriesBuffer>> {
        self.series
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_retention_ms(ms: u64) -> TimeSeriesStore {
        TimeSeriesStore::new(Duration::from_millis(ms))
    }

    #[test]
    fn test_expired_points_never_returned() {
        let store = store_with_retention_ms(1_000);
        let now = unix_millis_now();
        store.append_at("cpu", 50.0, Labels::new(), now.saturating_sub(5_000));
        store.append_at("cpu", 60.0, Labels::new(), now);

        let values: Vec<f64> = store.query("cpu").iter().map(|p| p.value).collect();
        assert_eq!(values, vec![60.0]);
    }

    #[test]
    fn test_expiry_applies_on_query_without_new_appends() {
        let store = store_with_retention_ms(1_000);
        let old = unix_millis_now().saturating_sub(10_000);
        store.append_at("cpu", 50.0, Labels::new(), old);
        // No later append; the lone stale point must still be invisible.
        assert!(store.query("cpu").is_empty());
    }

    #[test]
    fn test_per_name_independence() {
        let store = store_with_retention_ms(1_000);
        let now = unix_millis_now();
        store.append_at("cpu", 1.0, Labels::new(), now.saturating_sub(5_000));
        store.append_at("memory", 2.0, Labels::new(), now);

        assert!(store.query("cpu").is_empty());
        assert_eq!(store.query("memory").len(), 1);
    }

    #[test]
    fn test_unknown_name_queries_empty() {
        let store = store_with_retention_ms(1_000);
        assert!(store.query("never_written").is_empty());
        assert!(!store.contains("never_written"));
    }

    #[test]
    fn test_summaries_over_retained_window() {
        let store = store_with_retention_ms(60_000);
        let now = unix_millis_now();
        store.append_at("cpu", 10.0, Labels::new(), now.saturating_sub(10));
        store.append_at("cpu", 30.0, Labels::new(), now);

        let summaries = store.summaries();
        let cpu = summaries.get("cpu").unwrap();
        assert_eq!(cpu.count, 2);
        assert_eq!(cpu.last, 30.0);
        assert_eq!(cpu.min, 10.0);
        assert_eq!(cpu.max, 30.0);
    }

    #[test]
    fn test_concurrent_appends_preserve_order() {
        let store = Arc::new(store_with_retention_ms(60_000));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        store.append("requests", 1.0, Labels::new());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let points = store.query("requests");
        assert_eq!(points.len(), 1000);
        for pair in points.windows(2) {
            assert!(pair[0].timestamp_ms <= pair[1].timestamp_ms);
        }
    }
}

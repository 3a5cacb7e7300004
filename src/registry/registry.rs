//! The registry proper: named counters and histograms, auto-created on
//! first use and shared across all request-handling tasks.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use crate::registry::counter::Counter;
use crate::registry::histogram::{Histogram, HistogramSummary};

/// Label set attached to a metric. A `BTreeMap` keeps the identity
/// independent of insertion order.
pub type Labels = BTreeMap<String, String>;

/// Identity of a metric: name plus label set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricId {
    pub name: String,
    pub labels: Labels,
}

impl MetricId {
    pub fn new(name: &str, labels: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            labels: labels
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// In-process store of named counters and histograms.
///
/// One instance is constructed at startup and passed by reference to every
/// component that records or reads metrics. Mutation is safe under
/// unbounded concurrent callers; first use of a name creates exactly one
/// underlying metric even when two callers race.
#[derive(Debug, Default)]
pub struct MetricRegistry {
    counters: DashMap<MetricId, Arc<Counter>>,
    histograms: DashMap<MetricId, Arc<Histogram>>,
}

/// One counter in a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct CounterSnapshot {
    pub name: String,
    pub labels: Labels,
    pub value: u64,
}

/// One histogram in a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramSnapshot {
    pub name: String,
    pub labels: Labels,
    #[serde(flatten)]
    pub summary: HistogramSummary,
}

/// Point-in-time view of every registered metric.
///
/// Individual values are never torn; cross-metric consistency is not
/// guaranteed (writers keep running while the snapshot is taken).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegistrySnapshot {
    pub counters: Vec<CounterSnapshot>,
    pub histograms: Vec<HistogramSnapshot>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a counter, creating it on first use. Returns the new value.
    pub fn increment_counter(&self, name: &str, amount: u64, labels: &[(&str, &str)]) -> u64 {
        let id = MetricId::new(name, labels);
        let counter = self
            .counters
            .entry(id)
            .or_insert_with(|| Arc::new(Counter::new()))
            .clone();
        counter.increment(amount)
    }

    /// Record one observation into a histogram, creating it on first use.
    pub fn record_histogram(&self, name: &str, value: f64, labels: &[(&str, &str)]) {
        let id = MetricId::new(name, labels);
        let histogram = self
            .histograms
            .entry(id)
            .or_insert_with(|| Arc::new(Histogram::new()))
            .clone();
        histogram.record(value);
    }

    /// Snapshot every metric, sorted by (name, labels) for stable output.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut counters: Vec<CounterSnapshot> = self
            .counters
            .iter()
            .map(|entry| CounterSnapshot {
                name: entry.key().name.clone(),
                labels: entry.key().labels.clone(),
                value: entry.value().value(),
            })
            .collect();
        counters.sort_by(|a, b| (&a.name, &a.labels).cmp(&(&b.name, &b.labels)));

        let mut histograms: Vec<HistogramSnapshot> = self
            .histograms
            .iter()
            .map(|entry| HistogramSnapshot {
                name: entry.key().name.clone(),
                labels: entry.key().labels.clone(),
                summary: entry.value().summary(),
            })
            .collect();
        histograms.sort_by(|a, b| (&a.name, &a.labels).cmp(&(&b.name, &b.labels)));

        RegistrySnapshot {
            counters,
            histograms,
        }
    }
}

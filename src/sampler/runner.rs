//! The sampling loop.
//!
//! # Responsibilities
//! - Tick at a fixed interval, one cycle at a time
//! - Pull from the sample source and the registry
//! - Append points to the store and publish to the broadcaster
//! - Exit promptly on shutdown without corrupting an in-flight cycle

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::broadcast::{Broadcaster, CombinedSnapshot, LiveEvent};
use crate::registry::MetricRegistry;
use crate::sampler::source::SampleSource;
use crate::store::{unix_millis_now, TimeSeriesStore};

/// Series names for the system gauges written every cycle.
pub const CPU_SERIES: &str = "system_cpu_usage_percent";
pub const MEMORY_SERIES: &str = "system_memory_usage_percent";
pub const STORAGE_SERIES: &str = "system_storage_usage_percent";

/// Periodic task driving the collection pipeline.
pub struct Sampler {
    source: Arc<dyn SampleSource>,
    registry: Arc<MetricRegistry>,
    store: Arc<TimeSeriesStore>,
    broadcaster: Arc<Broadcaster>,
    interval: Duration,
    last_cycle_ms: Arc<AtomicU64>,
}

impl Sampler {
    pub fn new(
        source: Arc<dyn SampleSource>,
        registry: Arc<MetricRegistry>,
        store: Arc<TimeSeriesStore>,
        broadcaster: Arc<Broadcaster>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            registry,
            store,
            broadcaster,
            interval,
            last_cycle_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shared cell holding the wall-clock time of the last completed
    /// cycle, read by the health endpoint for liveness.
    pub fn last_cycle_handle(&self) -> Arc<AtomicU64> {
        self.last_cycle_ms.clone()
    }

    /// Run until the shutdown signal fires. A cycle that is underway when
    /// the signal arrives completes before the loop exits.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            retention_ms = self.store.retention().as_millis() as u64,
            "Sampler starting"
        );

        let mut ticker = time::interval(self.interval);
        // A long cycle delays the next tick; cycles never overlap.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.run_cycle();
                }
                _ = shutdown.recv() => {
                    tracing::info!("Sampler received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Execute one full cycle. Public so tests can drive cycles without
    /// waiting on the clock.
    pub fn run_cycle(&self) -> CombinedSnapshot {
        let system = self.source.sample();
        let registry = self.registry.snapshot();

        self.store.append_at(
            CPU_SERIES,
            system.cpu_usage_percent,
            Default::default(),
            system.timestamp_ms,
        );
        self.store.append_at(
            MEMORY_SERIES,
            system.memory_usage_percent,
            Default::default(),
            system.timestamp_ms,
        );
        self.store.append_at(
            STORAGE_SERIES,
            system.storage_usage_percent,
            Default::default(),
            system.timestamp_ms,
        );
        for counter in &registry.counters {
            self.store.append_at(
                &counter.name,
                counter.value as f64,
                counter.labels.clone(),
                system.timestamp_ms,
            );
        }

        let combined = CombinedSnapshot {
            timestamp_ms: system.timestamp_ms,
            system,
            registry,
        };
        self.broadcaster.publish(LiveEvent::MetricsUpdate(combined.clone()));
        self.last_cycle_ms.store(unix_millis_now(), Ordering::Relaxed);

        tracing::trace!(
            cpu = combined.system.cpu_usage_percent,
            memory = combined.system.memory_usage_percent,
            "Sampling cycle complete"
        );
        combined
    }
}

//! System resource sampling.
//!
//! # Responsibilities
//! - Read CPU, memory and storage usage once per invocation
//! - Stay best-effort: a failed read degrades to the last known value
//! - Never block longer than a refresh of the underlying OS counters

use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use serde::Serialize;
use sysinfo::{Disks, System};

use crate::store::unix_millis_now;

/// Instantaneous resource usage. Every field is a percentage in [0, 100].
#[derive(Debug, Clone, Serialize)]
pub struct SystemSnapshot {
    pub cpu_usage_percent: f64,
    pub memory_usage_percent: f64,
    pub storage_usage_percent: f64,
    pub timestamp_ms: u64,
}

impl SystemSnapshot {
    pub fn zero(timestamp_ms: u64) -> Self {
        Self {
            cpu_usage_percent: 0.0,
            memory_usage_percent: 0.0,
            storage_usage_percent: 0.0,
            timestamp_ms,
        }
    }
}

/// Source of system usage snapshots.
///
/// Implementations are platform-appropriate; callers only rely on the
/// 0-100 contract and on `sample` never panicking or erroring.
pub trait SampleSource: Send + Sync {
    fn sample(&self) -> SystemSnapshot;
}

/// `sysinfo`-backed source. Keeps the `System` handle alive between calls
/// so CPU usage is a delta over the sampling interval rather than a spot
/// read, and retains the last good snapshot for degraded fields.
pub struct SysinfoSource {
    system: Mutex<System>,
    last_good: ArcSwap<SystemSnapshot>,
}

impl SysinfoSource {
    pub fn new() -> Self {
        let mut system = System::new();
        // Prime the CPU counters; the first delta lands on the next refresh.
        system.refresh_cpu_usage();
        system.refresh_memory();
        Self {
            system: Mutex::new(system),
            last_good: ArcSwap::from_pointee(SystemSnapshot::zero(unix_millis_now())),
        }
    }

    /// The most recent successful snapshot.
    pub fn last_known(&self) -> SystemSnapshot {
        self.last_good.load().as_ref().clone()
    }
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for SysinfoSource {
    fn sample(&self) -> SystemSnapshot {
        let last = self.last_good.load_full();

        let (cpu, memory) = {
            let mut system = self.system.lock().unwrap();
            system.refresh_cpu_usage();
            system.refresh_memory();

            let cpu = clamp_percent(system.global_cpu_usage() as f64);
            let total = system.total_memory();
            let memory = if total == 0 {
                // Platform reports no memory information; keep the last value.
                last.memory_usage_percent
            } else {
                clamp_percent(system.used_memory() as f64 / total as f64 * 100.0)
            };
            (cpu, memory)
        };

        let disks = Disks::new_with_refreshed_list();
        let storage = disks
            .list()
            .iter()
            .find(|disk| disk.total_space() > 0)
            .map(|disk| {
                let total = disk.total_space() as f64;
                let used = total - disk.available_space() as f64;
                clamp_percent(used / total * 100.0)
            })
            .unwrap_or(last.storage_usage_percent);

        let snapshot = SystemSnapshot {
            cpu_usage_percent: cpu,
            memory_usage_percent: memory,
            storage_usage_percent: storage,
            timestamp_ms: unix_millis_now(),
        };
        self.last_good.store(Arc::new(snapshot.clone()));
        snapshot
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

//! Metric registry subsystem.
//!
//! # Data Flow
//! ```text
//! Request handlers / sampler produce:
//!     → counter.rs (atomic monotonic counters)
//!     → histogram.rs (count/sum/min/max summaries)
//!
//! Consumers:
//!     → registry.rs snapshot() (consistent point-in-time view)
//!     → exposition.rs (text format for /metrics scrapes)
//!     → broadcast (snapshot pushed to live subscribers)
//! ```
//!
//! # Design Decisions
//! - Metrics auto-create on first use; no registration step
//! - Identity is (name, label set); label order is irrelevant
//! - Updates are atomic operations, cheap enough for request paths
//! - snapshot() never blocks writers beyond brief per-shard locking

pub mod counter;
pub mod exposition;
pub mod histogram;
pub mod registry;

pub use counter::Counter;
pub use histogram::{Histogram, HistogramSummary};
pub use registry::{
    CounterSnapshot, HistogramSnapshot, Labels, MetricId, MetricRegistry, RegistrySnapshot,
};

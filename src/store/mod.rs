//! Time-series store subsystem.
//!
//! # Data Flow
//! ```text
//! Sampler appends points:
//!     → store.rs (per-name series, lock per name)
//!     → series.rs (ordered buffer, age-based purge)
//!
//! Consumers:
//!     → /api/history/{name} (retained points)
//!     → /api/summary (per-name last/avg/min/max/count)
//! ```
//!
//! # Design Decisions
//! - Retention is wall-clock based, enforced lazily on append and query
//! - Lock granularity is per metric name, not global
//! - One name's volume never evicts another name's points

pub mod point;
pub mod series;
pub mod store;

pub use point::MetricPoint;
pub use series::SeriesSummary;
pub use store::TimeSeriesStore;

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub fn unix_millis_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health
//!     → aggregator.rs probes every configured dependency concurrently,
//!       each bounded by the configured timeout
//!     → verdict.rs composes Healthy / Degraded / Unhealthy
//!     → JSON response with per-dependency detail
//! ```
//!
//! # Design Decisions
//! - A failing or timed-out dependency marks itself Unhealthy without
//!   aborting sibling checks
//! - Degraded is reserved for non-critical dependencies failing while
//!   critical ones succeed
//! - The verdict is recomputed on every invocation, never cached

pub mod aggregator;
pub mod verdict;

pub use aggregator::HealthAggregator;
pub use verdict::{DependencyCheck, HealthStatus, HealthVerdict};

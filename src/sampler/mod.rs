//! Periodic sampling subsystem.
//!
//! # Data Flow
//! ```text
//! Fixed-interval tick:
//!     source.rs → SystemSnapshot (cpu / memory / storage percent)
//!     registry  → RegistrySnapshot
//!     → store (system gauges + counter values appended as points)
//!     → broadcast (combined snapshot published to live subscribers)
//! ```
//!
//! # Design Decisions
//! - One cycle at a time; a slow cycle delays the next tick instead of
//!   overlapping it
//! - A failed cycle is logged and the loop continues
//! - Shutdown is observed within one tick; an in-flight cycle completes

pub mod runner;
pub mod source;

pub use runner::Sampler;
pub use source::{SampleSource, SysinfoSource, SystemSnapshot};

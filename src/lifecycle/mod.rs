//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main):
//!     Load config → Validate → Build registry/store/broadcaster
//!     → Spawn sampler → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast to sampler + server
//!     → In-flight cycle completes → Server drains → Exit
//! ```
//!
//! # Design Decisions
//! - One broadcast channel; every long-running task holds a receiver
//! - Shutdown is observed within one sleep/tick granularity
//! - Startup failures are fatal; runtime failures never are

pub mod shutdown;

pub use shutdown::Shutdown;

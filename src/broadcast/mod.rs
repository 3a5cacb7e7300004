//! Live broadcast subsystem.
//!
//! # Data Flow
//! ```text
//! Sampler / request handlers publish:
//!     → hub.rs (fan-out to per-subscriber bounded queues)
//!     → events.rs (typed payloads, serialized once per subscriber)
//!
//! Consumers:
//!     → /live WebSocket connections (one subscriber each)
//!     → in-process subscribers (tests, future pollers)
//! ```
//!
//! # Design Decisions
//! - publish() never blocks and never errors to its caller
//! - A full or closed subscriber queue unsubscribes that subscriber only
//! - Delivery order per subscriber equals publish order; no ordering
//!   guarantee across subscribers

pub mod events;
pub mod hub;

pub use events::{CombinedSnapshot, LiveEvent};
pub use hub::{Broadcaster, Subscriber};

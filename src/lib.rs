//! metrics-hub — in-process metrics collection, retention, and live broadcast.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌─────────────────────────────────────────────────────┐
//!                  │                     METRICS HUB                     │
//!                  │                                                     │
//!   HTTP requests  │  ┌──────────┐     ┌──────────┐    ┌──────────────┐  │
//!   ───────────────┼─▶│   http   │────▶│ registry │───▶│  exposition  │  │
//!                  │  │  server  │     │ counters │    │  (/metrics)  │  │
//!                  │  └────┬─────┘     └────▲─────┘    └──────────────┘  │
//!                  │       │                │                            │
//!                  │       │          ┌─────┴─────┐    ┌──────────────┐  │
//!                  │       │          │  sampler  │───▶│    store     │  │
//!                  │       │          │  (loop)   │    │ (retention)  │  │
//!                  │       │          └─────┬─────┘    └──────────────┘  │
//!                  │       │                │                            │
//!   WebSocket      │  ┌────▼─────┐    ┌─────▼─────┐                      │
//!   clients ◀──────┼──│  /live   │◀───│ broadcast │                      │
//!                  │  └──────────┘    └───────────┘                      │
//!                  │                                                     │
//!                  │  ┌───────────────────────────────────────────────┐  │
//!                  │  │            Cross-Cutting Concerns             │  │
//!                  │  │  ┌─────────┐  ┌────────┐  ┌─────────────────┐ │  │
//!                  │  │  │ config  │  │ health │  │    lifecycle    │ │  │
//!                  │  │  │         │  │ checks │  │ startup/shutdown│ │  │
//!                  │  │  └─────────┘  └────────┘  └─────────────────┘ │  │
//!                  │  └───────────────────────────────────────────────┘  │
//!                  └─────────────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod registry;
pub mod store;

// Collection pipeline
pub mod broadcast;
pub mod sampler;

// Cross-cutting concerns
pub mod health;
pub mod lifecycle;

pub use config::HubConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

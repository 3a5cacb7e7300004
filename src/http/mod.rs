//! HTTP surface subsystem.
//!
//! # Data Flow
//! ```text
//! GET /metrics          → registry snapshot → text exposition
//! GET /health           → aggregator + sampler liveness → JSON verdict
//! GET /live (WebSocket) → broadcaster subscription → pushed events
//! GET /api/summary      → store summaries + registry snapshot (JSON)
//! GET /api/history/{n}  → retained points for one series (JSON)
//! ```
//!
//! # Design Decisions
//! - Every request is stamped with a UUID request id and traced
//! - The server instruments itself through the same registry it serves
//! - /health always answers, whatever the dependencies are doing

pub mod handlers;
pub mod server;
pub mod websocket;

pub use server::{AppState, HttpServer};

//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ServerConfig::bind_address()
//!     → listener.rs (bind, classify failures)
//!     → Hand off to HTTP layer (axum::serve)
//! ```
//!
//! Connection accept, keep-alive and per-connection tasks belong to the HTTP
//! runtime; this layer only owns the socket.

pub mod listener;

pub use listener::{bind, ListenerError};

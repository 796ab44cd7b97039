//! HTTP service bootstrap.
//!
//! # Architecture Overview
//!
//! ```text
//!  .env / CLI / env vars      config/application[-<profile>].toml
//!            │                           │
//!            └──────────┬────────────────┘
//!                       ▼
//!                 ┌───────────┐      ┌───────────────┐
//!                 │  config   │─────▶│ observability │ (tracing subscriber)
//!                 └─────┬─────┘      └───────────────┘
//!                       ▼
//!                 ┌───────────┐      ┌───────────┐      ┌──────────────────┐
//!                 │ lifecycle │─────▶│    net    │─────▶│       http       │
//!                 │ Bootstrap │ bind │ listener  │      │ middleware +     │
//!                 └─────┬─────┘      └───────────┘      │ caller routes +  │
//!                       │                               │ 404 fallback     │
//!                       ▼                               └──────────────────┘
//!                RunningServer ── SIGINT/SIGTERM/stop() ──▶ drain ──▶ SHUT_DOWN
//! ```
//!
//! The crate registers no routes of its own; callers pass an
//! [`axum::Router`] to [`Bootstrap::routes`].

pub mod common;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::{AppConfig, ConfigOverrides};
pub use error::{AppError, FailureKind, ServeError, StartupError};
pub use http::HttpServer;
pub use lifecycle::{Bootstrap, RunningServer, ServerState, Shutdown, ShutdownSignals};

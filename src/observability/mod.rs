//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → request spans (http::server, carrying x-request-id)
//!
//! Consumers:
//!     → logging.rs subscriber → stdout (pretty or JSON)
//! ```

pub mod logging;

//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → inflight.rs (count while handled)
//!     → caller routes, or the 404 fallback
//!     → response.rs (JSON error bodies, panic → 500)
//!     → Send to client
//! ```

pub mod inflight;
pub mod request;
pub mod response;
pub mod server;

pub use inflight::InFlightTracker;
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::ErrorBody;
pub use server::HttpServer;

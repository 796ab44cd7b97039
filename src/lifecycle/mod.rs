//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Bind listener → Spawn serve task → RUNNING
//!
//! Shutdown (shutdown.rs):
//!     Signal or stop() → Stop accepting → Drain requests → SHUT_DOWN
//!
//! Signals (signals.rs):
//!     Handlers installed before bind → SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, listener last
//! - Ordered shutdown: stop accept, drain, close
//! - Shutdown has timeout: connections aborted after deadline

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod state;

pub use shutdown::{Shutdown, ShutdownListener};
pub use signals::{ShutdownSignals, Signal};
pub use startup::{Bootstrap, RunningServer};
pub use state::{LifecycleState, ServerState};

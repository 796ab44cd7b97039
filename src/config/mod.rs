//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config/application.toml (optional)
//!     → loader.rs (parse, profile overlay, overrides)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ConfigOverrides, DEFAULT_CONFIG_PATH};
pub use schema::{AppConfig, LogFormat, ObservabilityConfig, ServerConfig, TimeoutConfig};
pub use validation::ValidationError;

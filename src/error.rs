//! Error taxonomy.
//!
//! Two kinds of failure exist. A startup failure (bad configuration, port
//! unavailable) is fatal and ends the process with a non-zero status. A
//! runtime failure (a fault while serving one request) is logged and answered
//! with a `500`; the process keeps serving.

use std::fmt;
use std::process::ExitCode;

use crate::config::ConfigError;
use crate::net::listener::ListenerError;
use crate::observability::logging::LoggingError;

/// Which side of the taxonomy an error falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Startup,
    Runtime,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Startup => f.write_str("STARTUP_FAILURE"),
            FailureKind::Runtime => f.write_str("RUNTIME_FAILURE"),
        }
    }
}

/// Fatal error raised before the server reaches `Running`.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("logger error: {0}")]
    Logging(#[from] LoggingError),

    #[error("cannot install signal handlers: {0}")]
    Signals(#[source] std::io::Error),
}

impl StartupError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::Startup
    }

    /// True when the configured port is held by another socket.
    pub fn is_port_in_use(&self) -> bool {
        matches!(self, StartupError::Listener(ListenerError::AddrInUse { .. }))
    }
}

/// Error raised by a server that did start.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Top-level error of the binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error(transparent)]
    Serve(#[from] ServeError),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::net::SocketAddr;

    #[test]
    fn kind_names_match_taxonomy() {
        assert_eq!(FailureKind::Startup.to_string(), "STARTUP_FAILURE");
        assert_eq!(FailureKind::Runtime.to_string(), "RUNTIME_FAILURE");
    }

    #[test]
    fn port_in_use_is_a_startup_failure() {
        let address: SocketAddr = "127.0.0.1:8080".parse().unwrap();
        let err = StartupError::from(ListenerError::AddrInUse { address });

        assert!(err.is_port_in_use());
        assert_eq!(err.kind(), FailureKind::Startup);
        assert!(err.to_string().contains("127.0.0.1:8080"));
    }

    #[test]
    fn config_error_keeps_source() {
        let err = StartupError::from(ConfigError::Validation(Vec::new()));
        assert!(!err.is_port_in_use());
        assert!(err.to_string().starts_with("configuration error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn signal_install_failure_is_a_startup_failure() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "no signals here");
        let err = StartupError::Signals(io);
        assert_eq!(err.kind(), FailureKind::Startup);
        assert!(err.to_string().contains("no signals here"));
    }

    #[test]
    fn app_error_wraps_both_sides() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = AppError::from(ServeError::from(io));
        assert!(err.to_string().contains("boom"));
        let _: &dyn Error = &err;
    }
}

//! TCP listener binding.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Classify bind failures so an occupied port is reported as such
//!
//! # Design Decisions
//! - No retry: a failed bind is fatal
//! - One listener per process; a second bind on the same address fails

use std::net::SocketAddr;

use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Another socket already listens on the address.
    #[error("port already in use: {address}")]
    AddrInUse { address: SocketAddr },

    /// Any other bind failure (permission denied, address not local, ...).
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

impl ListenerError {
    fn from_io(address: SocketAddr, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::AddrInUse => ListenerError::AddrInUse { address },
            _ => ListenerError::Bind { address, source },
        }
    }
}

/// Bind a listener on `address`.
pub async fn bind(address: SocketAddr) -> Result<TcpListener, ListenerError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| ListenerError::from_io(address, e))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| ListenerError::from_io(address, e))?;

    tracing::info!(address = %local_addr, "Listener bound");

    Ok(listener)
}

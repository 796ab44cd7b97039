//! Shared utilities for integration tests.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use app_server::AppConfig;

/// Loopback config on an ephemeral port.
pub fn local_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.host = IpAddr::V4(Ipv4Addr::LOCALHOST);
    config.server.port = 0;
    config
}

/// Client without connection pooling, so shutdown never waits on idle sockets.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap()
}

/// Whether a TCP connection to `addr` succeeds.
#[allow(dead_code)]
pub async fn accepts_connections(addr: SocketAddr) -> bool {
    tokio::net::TcpStream::connect(addr).await.is_ok()
}

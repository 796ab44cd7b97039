//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Take the caller's routes and add the default fallback
//! - Wire up middleware (request ID, tracing, panic isolation, timeout)
//! - Serve on a bound listener until the shutdown signal fires

use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware,
    Router,
};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto,
};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{debug, info, warn, Span};

use crate::config::AppConfig;
use crate::http::inflight::{track_in_flight, InFlightTracker};
use crate::http::request::{request_id, MakeRequestUuidV4};
use crate::http::response;
use crate::lifecycle::shutdown::ShutdownListener;

/// HTTP server wrapping the finished router.
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server serving `routes` under the configured middleware.
    pub fn new(config: &AppConfig, routes: Router, in_flight: InFlightTracker) -> Self {
        Self {
            router: Self::build_router(config, routes, in_flight),
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers listed first in the `ServiceBuilder` run first.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, routes: Router, in_flight: InFlightTracker) -> Router {
        routes
            .fallback(response::not_found)
            .layer(middleware::from_fn_with_state(in_flight, track_in_flight))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(CatchPanicLayer::custom(response::panic_response))
                    .layer(TimeoutLayer::new(config.timeouts.request())),
            )
    }

    /// The finished router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server on `listener` until `shutdown` fires.
    ///
    /// After the signal no new connections are accepted and open connections
    /// finish their current request before closing. The future resolves once
    /// every connection is gone. Connection tasks belong to this future:
    /// dropping or aborting it aborts them too.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        info!(address = %addr, "HTTP server starting");

        let mut connections = JoinSet::new();
        loop {
            let (stream, remote_addr) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(pair) => pair,
                    Err(e) if is_connection_error(&e) => continue,
                    Err(e) => {
                        // Usually fd exhaustion; back off instead of spinning.
                        warn!(error = %e, "Accept failed");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        continue;
                    }
                },
                () = shutdown.triggered() => break,
            };

            while connections.try_join_next().is_some() {}
            connections.spawn(serve_connection(
                stream,
                remote_addr,
                self.router.clone(),
                shutdown.clone(),
            ));
        }

        drop(listener);
        info!(open_connections = connections.len(), "Stopped accepting, draining connections");
        while connections.join_next().await.is_some() {}

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Serve one connection, switching to a graceful close on shutdown.
async fn serve_connection(
    stream: TcpStream,
    remote_addr: SocketAddr,
    router: Router,
    mut shutdown: ShutdownListener,
) {
    let service = hyper::service::service_fn(move |mut request: Request<Incoming>| {
        request.extensions_mut().insert(ConnectInfo(remote_addr));
        router.clone().oneshot(request)
    });

    let builder = auto::Builder::new(TokioExecutor::new());
    let conn = builder.serve_connection_with_upgrades(TokioIo::new(stream), service);
    tokio::pin!(conn);

    let result = tokio::select! {
        result = conn.as_mut() => result,
        () = shutdown.triggered() => {
            conn.as_mut().graceful_shutdown();
            conn.as_mut().await
        }
    };

    if let Err(e) = result {
        debug!(remote = %remote_addr, error = %e, "Connection closed with error");
    }
}

fn is_connection_error(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::ConnectionReset
    )
}

fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request),
    )
}

//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Bind the listener and begin accepting traffic
//! - Hand back a [`RunningServer`] that owns the serve task
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, there is no retry
//! - The listener binds last (traffic only when ready)
//! - Shutdown has a deadline: connections still open after
//!   `shutdown_grace_secs` are aborted
//! - Signal handlers can be installed before binding, so a SIGTERM that
//!   arrives as soon as the port opens still drains

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::validation::validate_config;
use crate::config::{AppConfig, ConfigError};
use crate::error::{ServeError, StartupError};
use crate::http::{HttpServer, InFlightTracker};
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals::ShutdownSignals;
use crate::lifecycle::state::{LifecycleState, ServerState};
use crate::net::{self, ListenerError};

type ServeResult = Result<std::io::Result<()>, tokio::task::JoinError>;

/// Startup sequence: configuration in, running server out.
///
/// ```no_run
/// use app_server::{AppConfig, Bootstrap};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let server = Bootstrap::new(AppConfig::default()).start().await?;
/// server.run_until_signal().await?;
/// # Ok(())
/// # }
/// ```
#[must_use = "call .start().await to launch the server"]
#[derive(Debug)]
pub struct Bootstrap {
    config: AppConfig,
    routes: Router,
    signals: Option<ShutdownSignals>,
}

impl Bootstrap {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            routes: Router::new(),
            signals: None,
        }
    }

    /// Register routes. May be called repeatedly; paths must not overlap.
    pub fn routes(mut self, routes: Router) -> Self {
        self.routes = self.routes.merge(routes);
        self
    }

    /// Handlers for [`RunningServer::run_until_signal`], installed by the
    /// caller ahead of [`start`](Self::start).
    pub fn signals(mut self, signals: ShutdownSignals) -> Self {
        self.signals = Some(signals);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Validate, bind and start serving.
    ///
    /// On success the server is [`ServerState::Running`]. On failure nothing
    /// is left listening.
    pub async fn start(self) -> Result<RunningServer, StartupError> {
        let state = LifecycleState::new();
        match self.launch(&state).await {
            Ok(server) => Ok(server),
            Err(e) => {
                state.transition(ServerState::ShutDown);
                error!(kind = %e.kind(), error = %e, "Startup failed");
                Err(e)
            }
        }
    }

    async fn launch(self, state: &LifecycleState) -> Result<RunningServer, StartupError> {
        validate_config(&self.config).map_err(ConfigError::Validation)?;

        let address = self.config.server.bind_address();
        info!(
            profile = %self.config.profile,
            bind_address = %address,
            request_timeout_secs = self.config.timeouts.request_secs,
            shutdown_grace_secs = self.config.timeouts.shutdown_grace_secs,
            "Configuration loaded"
        );

        let listener = net::bind(address).await?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ListenerError::Bind { address, source })?;

        let shutdown = Shutdown::new();
        let in_flight = InFlightTracker::new();
        let server = HttpServer::new(&self.config, self.routes, in_flight.clone());
        let task = tokio::spawn(server.run(listener, shutdown.listener()));

        state.transition(ServerState::Running);
        info!(address = %local_addr, "Listening for connections");

        Ok(RunningServer {
            local_addr,
            state: state.clone(),
            shutdown,
            in_flight,
            grace: self.config.timeouts.shutdown_grace(),
            signals: self.signals,
            task,
        })
    }
}

/// Handle to a server in [`ServerState::Running`].
#[must_use = "dropping the handle leaves the server running unsupervised"]
#[derive(Debug)]
pub struct RunningServer {
    local_addr: SocketAddr,
    state: LifecycleState,
    shutdown: Shutdown,
    in_flight: InFlightTracker,
    grace: Duration,
    signals: Option<ShutdownSignals>,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// Address actually bound (resolves port `0`).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> ServerState {
        self.state.current()
    }

    pub fn state_receiver(&self) -> watch::Receiver<ServerState> {
        self.state.subscribe()
    }

    /// Requests currently being handled.
    pub fn in_flight(&self) -> u64 {
        self.in_flight.active_count()
    }

    /// Stop accepting, drain, close the socket.
    ///
    /// Connections still open when `shutdown_grace_secs` runs out are
    /// aborted; by the time this returns no handler is running.
    pub async fn stop(self) -> Result<(), ServeError> {
        let Self {
            state,
            shutdown,
            in_flight,
            grace,
            mut task,
            ..
        } = self;

        info!(
            in_flight = in_flight.active_count(),
            grace_secs = grace.as_secs(),
            "Stopping server, draining in-flight requests"
        );
        shutdown.trigger();

        let outcome = if let Ok(joined) = tokio::time::timeout(grace, &mut task).await {
            flatten(joined)
        } else {
            warn!(
                in_flight = in_flight.active_count(),
                "Drain deadline passed, aborting remaining connections"
            );
            // The serve task owns the connection tasks; aborting it aborts them.
            task.abort();
            let _ = task.await;
            Ok(())
        };

        state.transition(ServerState::ShutDown);
        info!("Shutdown complete");
        outcome
    }

    /// Serve until SIGINT/SIGTERM, then [`stop`](Self::stop).
    ///
    /// Uses the handlers passed to [`Bootstrap::signals`], installing them
    /// now when none were given.
    pub async fn run_until_signal(mut self) -> Result<(), ServeError> {
        let mut signals = match self.signals.take() {
            Some(signals) => signals,
            None => match ShutdownSignals::install() {
                Ok(signals) => signals,
                Err(e) => {
                    error!(error = %e, "Cannot listen for shutdown signals, serving until the server exits");
                    let joined = (&mut self.task).await;
                    self.state.transition(ServerState::ShutDown);
                    return flatten(joined);
                }
            },
        };

        tokio::select! {
            signal = signals.recv() => info!(signal = %signal, "Shutdown signal received"),
            joined = &mut self.task => {
                warn!("HTTP server exited without a shutdown signal");
                self.state.transition(ServerState::ShutDown);
                return flatten(joined);
            }
        }

        self.stop().await
    }
}

fn flatten(joined: ServeResult) -> Result<(), ServeError> {
    Ok(joined??)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn local_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.host = IpAddr::V4(Ipv4Addr::LOCALHOST);
        config.server.port = 0;
        config
    }

    #[tokio::test]
    async fn start_reaches_running_and_stop_reaches_shut_down() {
        let server = Bootstrap::new(local_config()).start().await.unwrap();
        let rx = server.state_receiver();

        assert_eq!(server.state(), ServerState::Running);
        assert_ne!(server.local_addr().port(), 0);
        assert_eq!(server.in_flight(), 0);

        server.stop().await.unwrap();
        assert_eq!(*rx.borrow(), ServerState::ShutDown);
    }

    #[tokio::test]
    async fn invalid_config_fails_before_binding() {
        let mut config = local_config();
        config.timeouts.request_secs = 0;

        let err = Bootstrap::new(config).start().await.unwrap_err();
        assert!(matches!(
            err,
            StartupError::Config(ConfigError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn occupied_port_is_startup_failure() {
        let first = Bootstrap::new(local_config()).start().await.unwrap();

        let mut config = local_config();
        config.server.port = first.local_addr().port();
        let err = Bootstrap::new(config).start().await.unwrap_err();
        assert!(err.is_port_in_use());

        first.stop().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn early_sigterm_drives_run_until_signal() {
        let signals = ShutdownSignals::install().unwrap();
        let server = Bootstrap::new(local_config())
            .signals(signals)
            .start()
            .await
            .unwrap();
        let rx = server.state_receiver();

        // Delivered before anything waits on the handlers.
        let sent = std::process::Command::new("kill")
            .args(["-TERM", &std::process::id().to_string()])
            .status()
            .unwrap();
        assert!(sent.success());

        tokio::time::timeout(Duration::from_secs(5), server.run_until_signal())
            .await
            .expect("signal was lost")
            .unwrap();
        assert_eq!(*rx.borrow(), ServerState::ShutDown);
    }

    #[test]
    fn routes_accumulate() {
        use axum::routing::get;

        let bootstrap = Bootstrap::new(AppConfig::default())
            .routes(Router::new().route("/a", get(|| async { "a" })))
            .routes(Router::new().route("/b", get(|| async { "b" })));
        assert_eq!(bootstrap.config().server.port, 8080);
    }
}

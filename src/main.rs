//! `app-server` entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI flags (each also readable from an env var)
//!   3. Load config: defaults → file → profile overlay → overrides
//!   4. Init logger at the configured level
//!   5. Bind and serve until SIGINT/SIGTERM

use std::net::IpAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use app_server::config::load_config;
use app_server::observability::logging;
use app_server::{AppError, Bootstrap, ConfigOverrides, ShutdownSignals, StartupError};

#[derive(Debug, Parser)]
#[command(name = "app-server", version, about = "HTTP service bootstrap", long_about = None)]
struct Cli {
    /// Configuration file [default: config/application.toml when present]
    #[arg(short, long, env = "APP_CONFIG")]
    config: Option<PathBuf>,

    /// Environment profile; selects the `<name>-<profile>.toml` overlay
    #[arg(long, env = "APP_PROFILE")]
    profile: Option<String>,

    /// Interface to bind
    #[arg(long, env = "APP_HOST")]
    host: Option<IpAddr>,

    /// Port to listen on
    #[arg(short, long, env = "APP_PORT")]
    port: Option<u16>,

    /// Log filter, takes precedence over RUST_LOG
    #[arg(long, env = "APP_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            profile: self.profile.clone(),
            host: self.host,
            port: self.port,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Optional file; a missing .env is not an error.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(cli.config.as_deref(), &cli.overrides()).map_err(StartupError::from)?;

    logging::init(&config.observability, cli.log_level.is_some()).map_err(StartupError::from)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        profile = %config.profile,
        "app-server starting"
    );

    // Before binding: once the port accepts, SIGTERM must already drain.
    let signals = ShutdownSignals::install().map_err(StartupError::Signals)?;

    let server = Bootstrap::new(config).signals(signals).start().await?;
    server.run_until_signal().await?;

    Ok(())
}

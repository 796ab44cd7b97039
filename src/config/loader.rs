//! Configuration loading from disk.
//!
//! Resolution order, later steps winning:
//! defaults → base file → `<stem>-<profile>.toml` overlay → [`ConfigOverrides`].

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::config::schema::{AppConfig, DEFAULT_PROFILE};
use crate::config::validation::{check_profile_name, validate_config, ValidationError};

/// Base file looked up when no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/application.toml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values that take precedence over anything read from files.
///
/// Populated from CLI flags and environment variables by the binary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub profile: Option<String>,
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level.clone_from(level);
        }
    }
}

/// Load and validate configuration.
///
/// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_PATH`] is read
/// when present and built-in defaults are used otherwise.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<AppConfig, ConfigError> {
    let base_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_PATH)).filter(|p| p.is_file()),
    };

    let mut table = match &base_path {
        Some(p) => read_table(p)?,
        None => toml::Table::new(),
    };

    let profile = overrides
        .profile
        .clone()
        .or_else(|| {
            table
                .get("profile")
                .and_then(toml::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    // The profile becomes part of a file name; reject it before touching disk.
    check_profile_name(&profile).map_err(|e| ConfigError::Validation(vec![e]))?;

    let overlay_path = base_path
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH))
        .to_path_buf();
    let overlay_path = profile_path(&overlay_path, &profile);
    let mut base_only = None;
    if overlay_path.is_file() {
        tracing::debug!(path = %overlay_path.display(), profile = %profile, "Applying profile overlay");
        let overlay = read_table(&overlay_path)?;
        base_only = Some(table.clone());
        merge_tables(&mut table, overlay);
    }

    let mut config = match deserialize(table) {
        Ok(config) => config,
        Err(source) => {
            // Blame the overlay only when the base file is fine on its own.
            let overlay_at_fault = base_only.is_some_and(|base| deserialize(base).is_ok());
            let origin = if overlay_at_fault {
                overlay_path.display().to_string()
            } else {
                base_path
                    .as_ref()
                    .map_or_else(|| "<defaults>".to_string(), |p| p.display().to_string())
            };
            return Err(ConfigError::Parse { origin, source });
        }
    };

    config.profile = profile;
    overrides.apply(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// `config/application.toml` + `dev` → `config/application-dev.toml`.
pub fn profile_path(base: &Path, profile: &str) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("application");
    let file_name = match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}-{profile}.{ext}"),
        None => format!("{stem}-{profile}"),
    };
    base.with_file_name(file_name)
}

fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        origin: path.display().to_string(),
        source,
    })
}

fn deserialize(table: toml::Table) -> Result<AppConfig, toml::de::Error> {
    toml::Value::Table(table).try_into()
}

/// Deep merge: nested tables merge key by key, everything else is replaced.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

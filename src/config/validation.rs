//! Configuration validation.
//!
//! Serde handles syntax and types; the checks here are semantic. Each rule is
//! evaluated on its own and every failure is reported, not just the first.

use tracing_subscriber::EnvFilter;

use crate::common::either::{collect_left_biased, Either};
use crate::config::schema::AppConfig;

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A rule yields the field it checked, or the reason it failed.
type Rule = fn(&AppConfig) -> Either<ValidationError, &'static str>;

const RULES: &[Rule] = &[
    check_profile,
    check_request_timeout,
    check_shutdown_grace,
    check_log_level,
];

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    match collect_left_biased(RULES.iter().map(|rule| rule(config))) {
        Either::Left(errors) if !errors.is_empty() => Err(errors),
        _ => Ok(()),
    }
}

fn check_profile(config: &AppConfig) -> Either<ValidationError, &'static str> {
    Either::from(check_profile_name(&config.profile).map(|()| PROFILE_FIELD))
}

const PROFILE_FIELD: &str = "profile";

/// Profile names end up in file names, so only `[A-Za-z0-9_-]` is allowed.
pub(crate) fn check_profile_name(profile: &str) -> Result<(), ValidationError> {
    if profile.is_empty() {
        return Err(ValidationError::new(PROFILE_FIELD, "must not be empty"));
    }
    if !profile
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::new(
            PROFILE_FIELD,
            format!("'{profile}' may only contain letters, digits, '-' and '_'"),
        ));
    }
    Ok(())
}

fn check_request_timeout(config: &AppConfig) -> Either<ValidationError, &'static str> {
    const FIELD: &str = "timeouts.request_secs";
    if config.timeouts.request_secs == 0 {
        Either::Left(ValidationError::new(FIELD, "must be greater than 0"))
    } else {
        Either::Right(FIELD)
    }
}

fn check_shutdown_grace(config: &AppConfig) -> Either<ValidationError, &'static str> {
    const FIELD: &str = "timeouts.shutdown_grace_secs";
    if config.timeouts.shutdown_grace_secs == 0 {
        Either::Left(ValidationError::new(FIELD, "must be greater than 0"))
    } else {
        Either::Right(FIELD)
    }
}

fn check_log_level(config: &AppConfig) -> Either<ValidationError, &'static str> {
    const FIELD: &str = "observability.log_level";
    let level = config.observability.log_level.trim();

    if level.is_empty() {
        return Either::Left(ValidationError::new(FIELD, "must not be empty"));
    }
    Either::from(
        EnvFilter::try_new(level)
            .map(|_| FIELD)
            .map_err(|e| ValidationError::new(FIELD, format!("invalid filter '{level}': {e}"))),
    )
}

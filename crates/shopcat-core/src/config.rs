use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Builds the configuration from an arbitrary variable lookup.
///
/// Every setting has a default, so the only failure mode is a value that is
/// set but malformed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let text = |var: &str, default: &str| lookup(var).unwrap_or_else(|_| default.to_owned());

    Ok(AppConfig {
        env: parse_environment(&text("SHOPCAT_ENV", "development")),
        bind_addr: parsed(&lookup, "SHOPCAT_BIND_ADDR", || {
            SocketAddr::from(([0, 0, 0, 0], 5000))
        })?,
        log_level: text("SHOPCAT_LOG_LEVEL", "info"),
        output_dir: PathBuf::from(text("SHOPCAT_OUTPUT_DIR", "./output")),
        scraper_request_timeout_secs: parsed(
            &lookup,
            "SHOPCAT_SCRAPER_REQUEST_TIMEOUT_SECS",
            || 30,
        )?,
        scraper_user_agent: text("SHOPCAT_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT),
        scraper_rate_limit_ms: parsed(&lookup, "SHOPCAT_SCRAPER_RATE_LIMIT_MS", || 1000)?,
        scraper_default_max_products: parsed(
            &lookup,
            "SHOPCAT_SCRAPER_DEFAULT_MAX_PRODUCTS",
            || 100,
        )?,
    })
}

/// Parses `var` when set (surrounding whitespace ignored), else returns the
/// default.
fn parsed<T, F>(lookup: &F, var: &str, default: impl FnOnce() -> T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    match lookup(var) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar {
            var: var.to_owned(),
            reason: format!("\"{raw}\": {e}"),
        }),
        Err(_) => Ok(default()),
    }
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the first
//! game is created.
//!
//! ## Optional Variables
//!
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `CODEBREAKER_POOL` - Default symbol pool for new games (default: `ABCDEF`)
//! - `CODEBREAKER_LENGTH` - Default code length, 1-20 (default: 4)
//! - `KEY_FORMAT` - External key encoding: `base36` or `base64url` (default: `base36`)
//! - `STALE_GAME_DAYS` - Days without a guess before a game is removed (default: 7)
//! - `SWEEP_INTERVAL_SECONDS` - Seconds between stale game sweeps (default: 3600)

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

use crate::domain::entities::{MAX_CODE_LENGTH, MIN_CODE_LENGTH};
use crate::domain::pool::Pool;
use crate::utils::key_codec::KeyFormat;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_format: String,
    /// Pool used when a new game does not name one.
    pub default_pool: String,
    /// Code length used when a new game does not name one.
    pub default_length: usize,
    pub key_format: KeyFormat,
    /// Games idle for this many days are removed by the sweeper.
    pub stale_game_days: u32,
    pub sweep_interval_seconds: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable or `KEY_FORMAT` cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
        let default_pool = env::var("CODEBREAKER_POOL").unwrap_or_else(|_| "ABCDEF".to_string());

        let default_length = parse_var("CODEBREAKER_LENGTH", 4)?;
        let stale_game_days = parse_var("STALE_GAME_DAYS", 7)?;
        let sweep_interval_seconds = parse_var("SWEEP_INTERVAL_SECONDS", 3600)?;

        let key_format = match env::var("KEY_FORMAT") {
            Ok(v) => v.parse::<KeyFormat>().map_err(anyhow::Error::msg)?,
            Err(_) => KeyFormat::default(),
        };

        Ok(Self {
            log_level,
            log_format,
            default_pool,
            default_length,
            key_format,
            stale_game_days,
            sweep_interval_seconds,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - the default pool is not a valid pool
    /// - the default length is outside 1-20
    /// - `stale_game_days` or `sweep_interval_seconds` is zero
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        Pool::parse(&self.default_pool)
            .with_context(|| format!("CODEBREAKER_POOL '{}' is invalid", self.default_pool))?;

        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&self.default_length) {
            anyhow::bail!(
                "CODEBREAKER_LENGTH must be between {} and {}, got {}",
                MIN_CODE_LENGTH,
                MAX_CODE_LENGTH,
                self.default_length
            );
        }

        if self.stale_game_days == 0 {
            anyhow::bail!("STALE_GAME_DAYS must be at least 1");
        }

        if self.sweep_interval_seconds == 0 {
            anyhow::bail!("SWEEP_INTERVAL_SECONDS must be greater than 0");
        }

        Ok(())
    }

    /// Logs a configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Default pool: {}", self.default_pool);
        tracing::info!("  Default length: {}", self.default_length);
        tracing::info!("  Key format: {}", self.key_format);
        tracing::info!("  Stale game days: {}", self.stale_game_days);
        tracing::info!("  Sweep interval: {}s", self.sweep_interval_seconds);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a non-negative integer, got '{v}'")),
        Err(_) => Ok(default),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "LOG_FORMAT",
        "CODEBREAKER_POOL",
        "CODEBREAKER_LENGTH",
        "KEY_FORMAT",
        "STALE_GAME_DAYS",
        "SWEEP_INTERVAL_SECONDS",
    ];

    fn clear_env() {
        // SAFETY: Tests touching the environment are run serially
        unsafe {
            for var in VARS {
                env::remove_var(var);
            }
        }
    }

    fn valid_config() -> Config {
        Config {
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            default_pool: "ABCDEF".to_string(),
            default_length: 4,
            key_format: KeyFormat::Base36,
            stale_game_days: 7,
            sweep_interval_seconds: 3600,
        }
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        assert!(config.validate().is_ok());

        config.log_format = "xml".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();
        assert!(config.validate().is_ok());

        config.default_pool = "A B".to_string();
        assert!(config.validate().is_err());
        config.default_pool = "ABCDEF".to_string();

        config.default_length = 21;
        assert!(config.validate().is_err());
        config.default_length = 0;
        assert!(config.validate().is_err());
        config.default_length = 20;
        assert!(config.validate().is_ok());

        config.stale_game_days = 0;
        assert!(config.validate().is_err());
        config.stale_game_days = 1;

        config.sweep_interval_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.log_format, "text");
        assert_eq!(config.default_pool, "ABCDEF");
        assert_eq!(config.default_length, 4);
        assert_eq!(config.key_format, KeyFormat::Base36);
        assert_eq!(config.stale_game_days, 7);
        assert_eq!(config.sweep_interval_seconds, 3600);
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("CODEBREAKER_POOL", "0123456789");
            env::set_var("CODEBREAKER_LENGTH", "6");
            env::set_var("KEY_FORMAT", "base64url");
            env::set_var("STALE_GAME_DAYS", "30");
        }

        let config = load_from_env().unwrap();
        assert_eq!(config.default_pool, "0123456789");
        assert_eq!(config.default_length, 6);
        assert_eq!(config.key_format, KeyFormat::Base64Url);
        assert_eq!(config.stale_game_days, 30);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_unparsable_values_rejected() {
        clear_env();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("CODEBREAKER_LENGTH", "four");
        }
        assert!(Config::from_env().is_err());

        clear_env();
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("KEY_FORMAT", "hex");
        }
        assert!(Config::from_env().is_err());

        clear_env();
    }
}

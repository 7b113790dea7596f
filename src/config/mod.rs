//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `FAMILY_GROUPS_` prefix and nested values use underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use family_groups::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Mailing from {}", config.email.from_header());
//! ```

mod database;
mod email;
mod error;

pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the family-groups service.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Email configuration (Resend)
    pub email: EmailConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `FAMILY_GROUPS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `FAMILY_GROUPS__DATABASE__URL=...` -> `database.url = ...`
    /// - `FAMILY_GROUPS__EMAIL__RESEND_API_KEY=...` -> `email.resend_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FAMILY_GROUPS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Performs semantic validation of configuration:
    /// - URL formats
    /// - Pool size constraints
    /// - Required API key prefixes
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.email.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Helper to set environment variables for testing
    /// Uses double underscores to separate nested config values
    fn set_minimal_env() {
        env::set_var(
            "FAMILY_GROUPS__DATABASE__URL",
            "postgresql://test@localhost/test",
        );
        env::set_var("FAMILY_GROUPS__EMAIL__RESEND_API_KEY", "re_xxx");
    }

    /// Helper to clear environment variables after testing
    fn clear_env() {
        env::remove_var("FAMILY_GROUPS__DATABASE__URL");
        env::remove_var("FAMILY_GROUPS__EMAIL__RESEND_API_KEY");
        env::remove_var("FAMILY_GROUPS__EMAIL__FROM_NAME");
        env::remove_var("FAMILY_GROUPS__DATABASE__MAX_CONNECTIONS");
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.email.resend_api_key, "re_xxx");
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok());
        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_email_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.email.from_name, "Family Groups");
        assert!(config.email.invites_url.starts_with("https://"));
    }

    #[test]
    fn test_custom_from_name() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("FAMILY_GROUPS__EMAIL__FROM_NAME", "Acme Families");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.email.from_name, "Acme Families");
    }

    #[test]
    fn test_custom_pool_size() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("FAMILY_GROUPS__DATABASE__MAX_CONNECTIONS", "40");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.database.max_connections, 40);
    }
}

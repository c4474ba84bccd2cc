//! Configuration management for the package editor
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::PackageError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelPackConfig {
    /// Hosted backend connection
    #[serde(default)]
    pub backend: BackendConfig,
    /// Backend table names
    #[serde(default)]
    pub tables: TablesConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hosted backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL; tables live under `{url}/rest/v1/`
    #[serde(default = "default_backend_url")]
    pub url: String,
    /// Project API key, sent as `apikey` and bearer token
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_backend_timeout")]
    pub timeout_seconds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablesConfig {
    #[serde(default = "default_packages_table")]
    pub packages: String,
    #[serde(default = "default_itineraries_table")]
    pub itineraries: String,
    #[serde(default = "default_places_table")]
    pub places: String,
    #[serde(default = "default_destinations_table")]
    pub destinations: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_backend_url() -> String {
    "http://localhost:54321".to_string()
}

fn default_backend_timeout() -> u32 {
    30
}

fn default_packages_table() -> String {
    "packages".to_string()
}

fn default_itineraries_table() -> String {
    "itineraries".to_string()
}

fn default_places_table() -> String {
    "places".to_string()
}

fn default_destinations_table() -> String {
    "destinations".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            api_key: None,
            timeout_seconds: default_backend_timeout(),
        }
    }
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            packages: default_packages_table(),
            itineraries: default_itineraries_table(),
            places: default_places_table(),
            destinations: default_destinations_table(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl TravelPackConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRAVELPACK_BACKEND__API_KEY overrides backend.api_key
        builder = builder.add_source(
            Environment::with_prefix("TRAVELPACK")
                .prefix_separator("_")
                .separator("__"),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TravelPackConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travelpack").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.backend.url.is_empty() {
            self.backend.url = default_backend_url();
        }
        if self.backend.timeout_seconds == 0 {
            self.backend.timeout_seconds = default_backend_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_backend()?;
        self.validate_tables()?;
        self.validate_logging()?;
        Ok(())
    }

    fn validate_backend(&self) -> Result<()> {
        let url = &self.backend.url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(
                PackageError::config("Backend URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        if self.backend.timeout_seconds > 300 {
            return Err(
                PackageError::config("Backend timeout cannot exceed 300 seconds").into(),
            );
        }

        if let Some(api_key) = &self.backend.api_key {
            if api_key.trim().is_empty() {
                return Err(PackageError::config(
                    "Backend API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        Ok(())
    }

    fn validate_tables(&self) -> Result<()> {
        let tables = [
            ("packages", &self.tables.packages),
            ("itineraries", &self.tables.itineraries),
            ("places", &self.tables.places),
            ("destinations", &self.tables.destinations),
        ];
        for (name, value) in tables {
            if value.trim().is_empty() {
                return Err(PackageError::config(format!(
                    "Table name for '{name}' cannot be empty"
                ))
                .into());
            }
        }
        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PackageError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PackageError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

//! Configuration management for the Seoul Explorer application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ExplorerError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the Seoul Explorer application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Location tracking timings
    #[serde(default)]
    pub tracking: TrackingConfig,
    /// Reverse geocoding service
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Presentation defaults
    #[serde(default)]
    pub display: DisplayConfig,
    /// Local storage locations
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Location tracking configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Automatic retries after failed acquisitions
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff unit; retry n waits base * 2^n
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    /// Interval between periodic position polls
    #[serde(default = "default_periodic_interval")]
    pub periodic_interval_secs: u64,
    /// Interval between health checks
    #[serde(default = "default_health_check_interval")]
    pub health_check_interval_secs: u64,
    /// Silence after which tracking is restarted
    #[serde(default = "default_stale_after")]
    pub stale_after_secs: u64,
    /// Pause between teardown and restart
    #[serde(default = "default_restart_grace_ms")]
    pub restart_grace_ms: u64,
    /// Movement that counts as a new position
    #[serde(default = "default_min_movement_meters")]
    pub min_movement_meters: u32,
    /// Age after which a stationary position is refreshed
    #[serde(default = "default_refresh_after")]
    pub refresh_after_secs: u64,
    #[serde(default = "default_one_shot_timeout_ms")]
    pub one_shot_timeout_ms: u64,
    #[serde(default = "default_one_shot_max_age_ms")]
    pub one_shot_max_age_ms: u64,
    #[serde(default = "default_watch_timeout_ms")]
    pub watch_timeout_ms: u64,
    #[serde(default = "default_watch_max_age_ms")]
    pub watch_max_age_ms: u64,
    /// Request high-accuracy fixes from the platform
    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: bool,
}

/// Reverse geocoding configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Geocoding API key; without one the offline district lookup is used
    pub api_key: Option<String>,
    /// Base URL for the geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    #[serde(default = "default_geocoding_language")]
    pub language: String,
    #[serde(default = "default_geocoding_region")]
    pub region: String,
    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_seconds: u32,
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

/// Presentation defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Number of nearby attractions listed
    #[serde(default = "default_nearby_limit")]
    pub nearby_limit: u32,
}

/// Local storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Favorites store directory
    pub favorites_path: Option<PathBuf>,
}

// Default value functions
fn default_max_retries() -> u32 {
    5
}

fn default_retry_base_delay_ms() -> u64 {
    1_000
}

fn default_periodic_interval() -> u64 {
    45
}

fn default_health_check_interval() -> u64 {
    60
}

fn default_stale_after() -> u64 {
    120
}

fn default_restart_grace_ms() -> u64 {
    2_000
}

fn default_min_movement_meters() -> u32 {
    30
}

fn default_refresh_after() -> u64 {
    120
}

fn default_one_shot_timeout_ms() -> u64 {
    10_000
}

fn default_one_shot_max_age_ms() -> u64 {
    30_000
}

fn default_watch_timeout_ms() -> u64 {
    15_000
}

fn default_watch_max_age_ms() -> u64 {
    45_000
}

fn default_high_accuracy() -> bool {
    true
}

fn default_geocoding_base_url() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}

fn default_geocoding_language() -> String {
    "en".to_string()
}

fn default_geocoding_region() -> String {
    "US".to_string()
}

fn default_geocoding_timeout() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_nearby_limit() -> u32 {
    3
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            periodic_interval_secs: default_periodic_interval(),
            health_check_interval_secs: default_health_check_interval(),
            stale_after_secs: default_stale_after(),
            restart_grace_ms: default_restart_grace_ms(),
            min_movement_meters: default_min_movement_meters(),
            refresh_after_secs: default_refresh_after(),
            one_shot_timeout_ms: default_one_shot_timeout_ms(),
            one_shot_max_age_ms: default_one_shot_max_age_ms(),
            watch_timeout_ms: default_watch_timeout_ms(),
            watch_max_age_ms: default_watch_max_age_ms(),
            high_accuracy: default_high_accuracy(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_geocoding_base_url(),
            language: default_geocoding_language(),
            region: default_geocoding_region(),
            timeout_seconds: default_geocoding_timeout(),
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

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            nearby_limit: default_nearby_limit(),
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
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

        // SEOUL_EXPLORER_GEOCODING__API_KEY -> geocoding.api_key
        builder = builder.add_source(
            Environment::with_prefix("SEOUL_EXPLORER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ExplorerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("seoul-explorer").join("config.toml"))
    }

    /// Favorites directory, configured or under the platform data dir
    #[must_use]
    pub fn favorites_path(&self) -> PathBuf {
        self.storage.favorites_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("seoul-explorer")
                .join("favorites")
        })
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        let tracking = &mut self.tracking;
        if tracking.max_retries == 0 {
            tracking.max_retries = default_max_retries();
        }
        if tracking.retry_base_delay_ms == 0 {
            tracking.retry_base_delay_ms = default_retry_base_delay_ms();
        }
        if tracking.periodic_interval_secs == 0 {
            tracking.periodic_interval_secs = default_periodic_interval();
        }
        if tracking.health_check_interval_secs == 0 {
            tracking.health_check_interval_secs = default_health_check_interval();
        }
        if tracking.stale_after_secs == 0 {
            tracking.stale_after_secs = default_stale_after();
        }
        if tracking.one_shot_timeout_ms == 0 {
            tracking.one_shot_timeout_ms = default_one_shot_timeout_ms();
        }
        if tracking.watch_timeout_ms == 0 {
            tracking.watch_timeout_ms = default_watch_timeout_ms();
        }
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_geocoding_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.display.nearby_limit == 0 {
            self.display.nearby_limit = default_nearby_limit();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.geocoding.api_key {
            if api_key.is_empty() {
                return Err(ExplorerError::config(
                    "Geocoding API key cannot be empty if provided. \
                     Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() < 8 {
                return Err(ExplorerError::config(
                    "Geocoding API key appears to be invalid (too short). \
                     Please check your API key.",
                )
                .into());
            }

            if api_key.len() > 100 {
                return Err(ExplorerError::config(
                    "Geocoding API key appears to be invalid (too long). Please check your API key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        let tracking = &self.tracking;

        if tracking.max_retries > 10 {
            return Err(ExplorerError::config("Tracking max retries cannot exceed 10").into());
        }

        if tracking.one_shot_timeout_ms > 300_000 || tracking.watch_timeout_ms > 300_000 {
            return Err(ExplorerError::config(
                "Position timeout cannot exceed 300000 ms"
            ).into());
        }

        if tracking.periodic_interval_secs > 3_600 || tracking.health_check_interval_secs > 3_600 {
            return Err(ExplorerError::config(
                "Tracking intervals cannot exceed 3600 seconds"
            ).into());
        }

        if tracking.min_movement_meters > 10_000 {
            return Err(ExplorerError::config(
                "Minimum movement cannot exceed 10000 meters"
            ).into());
        }

        if self.geocoding.timeout_seconds > 300 {
            return Err(ExplorerError::config(
                "Geocoding timeout cannot exceed 300 seconds"
            ).into());
        }

        if self.display.nearby_limit > 50 {
            return Err(ExplorerError::config("Nearby limit cannot exceed 50").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ExplorerError::config(
                format!("Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_log_levels.join(", ")
                )
            ).into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ExplorerError::config(
                format!("Invalid log format '{}'. Must be one of: {}",
                    self.logging.format,
                    valid_log_formats.join(", ")
                )
            ).into());
        }

        let base_url = &self.geocoding.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ExplorerError::config(
                "Geocoding base URL must be a valid HTTP or HTTPS URL"
            ).into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ExplorerConfig::default();
        assert_eq!(config.tracking.max_retries, 5);
        assert_eq!(config.tracking.periodic_interval_secs, 45);
        assert_eq!(config.tracking.min_movement_meters, 30);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.display.nearby_limit, 3);
        assert!(config.geocoding.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_valid_api_key() {
        let mut config = ExplorerConfig::default();
        config.geocoding.api_key = Some("valid_api_key_123".to_string());
        assert!(config.validate_api_keys().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = ExplorerConfig::default();
        config.geocoding.api_key = Some("short".to_string());
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = ExplorerConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = ExplorerConfig::default();
        config.tracking.max_retries = 50;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("max retries cannot exceed"));
    }

    #[test]
    fn test_apply_defaults_fills_zero_values() {
        let mut config = ExplorerConfig::default();
        config.tracking.max_retries = 0;
        config.display.nearby_limit = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.tracking.max_retries, 5);
        assert_eq!(config.display.nearby_limit, 3);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[tracking]\nperiodic_interval_secs = 30\n\n[display]\nnearby_limit = 5"
        )
        .unwrap();

        let config = ExplorerConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.tracking.periodic_interval_secs, 30);
        assert_eq!(config.tracking.max_retries, 5);
        assert_eq!(config.display.nearby_limit, 5);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_config_path_generation() {
        let path = ExplorerConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("seoul-explorer"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}

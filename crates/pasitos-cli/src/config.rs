//! Configuration file management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Minimum sampling interval in seconds (10 seconds).
pub const MIN_SAMPLING_INTERVAL: u64 = 10;
/// Maximum sampling interval in seconds (1 hour).
pub const MAX_SAMPLING_INTERVAL: u64 = 3600;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage settings.
    pub storage: StorageConfig,
    /// Sampling timer settings.
    pub sampling: SamplingConfig,
    /// GPS input settings.
    pub location: LocationConfig,
    /// Battery input settings.
    pub battery: BatteryConfig,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration and return every problem found.
    ///
    /// This checks:
    /// - Storage path is not empty
    /// - Sampling interval is within 10s - 1 hour
    /// - NMEA path is not empty and the fix age limit is positive
    /// - Power supply directory is not empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.storage.validate());
        errors.extend(self.sampling.validate());
        errors.extend(self.location.validate());
        errors.extend(self.battery.validate());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: pasitos_store::default_db_path(),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "storage.path".to_string(),
                message: "database path cannot be empty".to_string(),
            });
        }
        errors
    }
}

/// Sampling timer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Seconds between samples.
    pub interval_secs: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_secs: pasitos_core::DEFAULT_INTERVAL.as_secs(),
        }
    }
}

impl SamplingConfig {
    /// The interval as a duration.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Validate sampling configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.interval_secs < MIN_SAMPLING_INTERVAL {
            errors.push(ValidationError {
                field: "sampling.interval_secs".to_string(),
                message: format!(
                    "interval {} is too short (minimum {} seconds)",
                    self.interval_secs, MIN_SAMPLING_INTERVAL
                ),
            });
        } else if self.interval_secs > MAX_SAMPLING_INTERVAL {
            errors.push(ValidationError {
                field: "sampling.interval_secs".to_string(),
                message: format!(
                    "interval {} is too long (maximum {} seconds / 1 hour)",
                    self.interval_secs, MAX_SAMPLING_INTERVAL
                ),
            });
        }
        errors
    }
}

/// GPS input configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// File receiving the NMEA 0183 stream (e.g. from `gpspipe -r`).
    pub nmea_path: PathBuf,
    /// A file not written for longer than this has no fix.
    pub max_fix_age_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            nmea_path: default_nmea_path(),
            max_fix_age_secs: 600,
        }
    }
}

impl LocationConfig {
    /// The fix age limit as a duration.
    pub fn max_fix_age(&self) -> Duration {
        Duration::from_secs(self.max_fix_age_secs)
    }

    /// Validate GPS input configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.nmea_path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "location.nmea_path".to_string(),
                message: "NMEA path cannot be empty".to_string(),
            });
        }
        if self.max_fix_age_secs == 0 {
            errors.push(ValidationError {
                field: "location.max_fix_age_secs".to_string(),
                message: "maximum fix age must be at least 1 second".to_string(),
            });
        }
        errors
    }
}

/// Battery input configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Directory listing power supplies.
    pub power_supply_dir: PathBuf,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            power_supply_dir: PathBuf::from("/sys/class/power_supply"),
        }
    }
}

impl BatteryConfig {
    /// Validate battery input configuration.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.power_supply_dir.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "battery.power_supply_dir".to_string(),
                message: "power supply directory cannot be empty".to_string(),
            });
        }
        errors
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    Validation(Vec<ValidationError>),
}

/// A single validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The field path (e.g., `sampling.interval_secs`).
    pub field: String,
    /// Description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Default configuration file path.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pasitos")
        .join("config.toml")
}

/// Default NMEA input file.
pub fn default_nmea_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pasitos")
        .join("gps.nmea")
}

/// Log file used while the terminal map owns the screen.
pub fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pasitos")
        .join("pasitos.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.sampling.interval_secs, 300);
        assert_eq!(config.sampling.interval(), Duration::from_secs(300));
        assert_eq!(config.storage.path, pasitos_store::default_db_path());
        assert_eq!(config.location.max_fix_age_secs, 600);
        assert_eq!(
            config.battery.power_supply_dir,
            PathBuf::from("/sys/class/power_supply")
        );
    }

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
            [sampling]
            interval_secs = 120
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.sampling.interval_secs, 120);
        assert_eq!(config.storage.path, pasitos_store::default_db_path());
        assert_eq!(config.location.max_fix_age_secs, 600);
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("invalid.toml");
        std::fs::write(&config_path, "this is not valid { toml").unwrap();

        let result = Config::load(&config_path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_default_paths() {
        assert!(default_config_path().ends_with("pasitos/config.toml"));
        assert!(default_nmea_path().ends_with("pasitos/gps.nmea"));
        assert!(default_log_path().ends_with("pasitos/pasitos.log"));
    }

    #[test]
    fn test_sampling_interval_bounds() {
        assert!(SamplingConfig { interval_secs: 10 }.validate().is_empty());
        assert!(SamplingConfig { interval_secs: 3600 }.validate().is_empty());

        let errors = SamplingConfig { interval_secs: 5 }.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("too short"));

        let errors = SamplingConfig { interval_secs: 7200 }.validate();
        assert!(errors[0].message.contains("too long"));
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let config = Config {
            storage: StorageConfig {
                path: PathBuf::new(),
            },
            sampling: SamplingConfig { interval_secs: 1 },
            location: LocationConfig {
                nmea_path: PathBuf::new(),
                max_fix_age_secs: 0,
            },
            battery: BatteryConfig {
                power_supply_dir: PathBuf::new(),
            },
        };

        let Err(ConfigError::Validation(errors)) = config.validate() else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 5);

        let display = ConfigError::Validation(errors).to_string();
        assert!(display.contains("storage.path"));
        assert!(display.contains("sampling.interval_secs"));
        assert!(display.contains("location.max_fix_age_secs"));
    }

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError {
            field: "sampling.interval_secs".to_string(),
            message: "too short".to_string(),
        };
        assert_eq!(error.to_string(), "sampling.interval_secs: too short");
    }
}

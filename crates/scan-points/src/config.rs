//! Engine configuration using Figment
//!
//! Configuration is loaded from:
//! 1. `config/scan_points.toml` (or an explicit file)
//! 2. Environment variables prefixed with `SCAN_POINTS_`, nested keys
//!    separated by a double underscore
//!
//! Every field has a default, so a missing file yields a usable config.
//!
//! # Example
//! ```no_run
//! use scan_points::config::PointsConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // SCAN_POINTS_GENERATOR__MAX_MASK_EVALUATIONS=1000000 overrides the file
//! let config = PointsConfig::load()?;
//! config.validate()?;
//! println!("mask limit: {}", config.generator.max_mask_evaluations);
//! # Ok(())
//! # }
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use scan_core::error::ScanResult;
use scan_core::limits::{DEFAULT_MAX_MASK_EVALUATIONS, DEFAULT_MAX_MATERIALIZED_POINTS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointsConfig {
    /// Generator limits
    #[serde(default)]
    pub generator: GeneratorSettings,
    /// Logging output
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Limits applied while building and materializing generators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Most points enumerated to compute one region mask
    #[serde(default = "default_max_mask_evaluations")]
    pub max_mask_evaluations: usize,
    /// Most points returned by the eager `create_points` form
    #[serde(default = "default_max_materialized_points")]
    pub max_materialized_points: usize,
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty-printed with colors (for development)
    #[default]
    Pretty,
    /// Single-line without colors
    Compact,
    /// JSON lines for log aggregation
    Json,
}

// Default value functions
fn default_max_mask_evaluations() -> usize {
    DEFAULT_MAX_MASK_EVALUATIONS
}

fn default_max_materialized_points() -> usize {
    DEFAULT_MAX_MATERIALIZED_POINTS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            max_mask_evaluations: default_max_mask_evaluations(),
            max_materialized_points: default_max_materialized_points(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl PointsConfig {
    /// Load configuration from `config/scan_points.toml` and environment variables
    ///
    /// Example: `SCAN_POINTS_LOGGING__LEVEL=debug`
    pub fn load() -> ScanResult<Self> {
        Self::load_from("config/scan_points.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from<P: AsRef<Path>>(path: P) -> ScanResult<Self> {
        let config = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("SCAN_POINTS_").split("__"))
            .extract()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }

        if self.generator.max_mask_evaluations == 0 {
            return Err("max_mask_evaluations must be at least 1".to_string());
        }

        if self.generator.max_materialized_points == 0 {
            return Err("max_materialized_points must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    #[serial]
    fn test_missing_file_uses_defaults() {
        let config = PointsConfig::load_from("does/not/exist.toml").unwrap();
        assert_eq!(config, PointsConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [generator]
            max_mask_evaluations = 1000

            [logging]
            level = "debug"
            format = "json"
            "#
        )
        .unwrap();

        let config = PointsConfig::load_from(file.path()).unwrap();
        assert_eq!(config.generator.max_mask_evaluations, 1000);
        assert_eq!(
            config.generator.max_materialized_points,
            DEFAULT_MAX_MATERIALIZED_POINTS
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        std::env::set_var("SCAN_POINTS_GENERATOR__MAX_MATERIALIZED_POINTS", "42");
        let config = PointsConfig::load_from("does/not/exist.toml");
        std::env::remove_var("SCAN_POINTS_GENERATOR__MAX_MATERIALIZED_POINTS");

        assert_eq!(config.unwrap().generator.max_materialized_points, 42);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = PointsConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        let mut config = PointsConfig::default();
        config.generator.max_mask_evaluations = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/scan_points.toml");
        let text = std::fs::read_to_string(path).unwrap();
        let config: PointsConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, PointsConfig::default());
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[generator]\nmax_mask_evaluations = \"many\"").unwrap();
        let err = PointsConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, scan_core::ScanError::Config(_)));
    }
}

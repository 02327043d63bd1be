//! Configuration management for fraudlens
//!
//! This module handles loading, validation, and management of
//! fraudlens configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Engine thresholds for enrichment and derived fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Amount above which the fallback rule flags a transaction
    #[serde(default = "default_fallback_amount")]
    pub fallback_amount_threshold: f64,
    /// Failed login attempts above which the fallback rule flags a transaction
    #[serde(default = "default_fallback_failed_logins")]
    pub fallback_failed_login_threshold: f64,
    /// Amount above which a transaction counts as high-value
    #[serde(default = "default_high_value")]
    pub high_value_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_amount_threshold: default_fallback_amount(),
            fallback_failed_login_threshold: default_fallback_failed_logins(),
            high_value_threshold: default_high_value(),
        }
    }
}

fn default_fallback_amount() -> f64 {
    100_000.0
}

fn default_fallback_failed_logins() -> f64 {
    3.0
}

fn default_high_value() -> f64 {
    50_000.0
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records per page for table views
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            records_per_page: default_records_per_page(),
        }
    }
}

fn default_records_per_page() -> usize {
    10
}

/// Risk assessment thresholds (fraud rate, in percent)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Fraud rate above which risk is reported as High
    #[serde(default = "default_risk_high")]
    pub high_percent: f64,
    /// Fraud rate above which risk is reported as Medium
    #[serde(default = "default_risk_medium")]
    pub medium_percent: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            high_percent: default_risk_high(),
            medium_percent: default_risk_medium(),
        }
    }
}

fn default_risk_high() -> f64 {
    5.0
}

fn default_risk_medium() -> f64 {
    2.0
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text tables
    Text,
    /// JSON report
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Text
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Report settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Engine thresholds
    #[serde(default)]
    pub engine: EngineConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Risk assessment thresholds
    #[serde(default)]
    pub risk: RiskConfig,
    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&path)
            .map_err(|_| ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            })?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|_| ConfigError::InvalidYaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pagination.records_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.records_per_page".to_string(),
                reason: "Records per page must be greater than 0".to_string(),
            });
        }

        if self.engine.fallback_amount_threshold < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.fallback_amount_threshold".to_string(),
                reason: "Threshold must not be negative".to_string(),
            });
        }

        if self.engine.high_value_threshold < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "engine.high_value_threshold".to_string(),
                reason: "Threshold must not be negative".to_string(),
            });
        }

        if self.risk.medium_percent > self.risk.high_percent {
            return Err(ConfigError::InvalidValue {
                field: "risk.medium_percent".to_string(),
                reason: "Medium risk threshold must not exceed the high threshold".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pagination.records_per_page, 10);
        assert_eq!(config.engine.fallback_amount_threshold, 100_000.0);
        assert_eq!(config.engine.high_value_threshold, 50_000.0);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let mut config = Config::default();
        config.pagination.records_per_page = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_risk_thresholds_rejected() {
        let mut config = Config::default();
        config.risk.medium_percent = 10.0;
        config.risk.high_percent = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_template_parses() {
        let config: Config = serde_yaml::from_str(Config::generate_default())
            .expect("default template should parse");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_format_roundtrip() {
        use std::str::FromStr;
        assert_eq!(OutputFormat::from_str("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("TEXT").unwrap(), OutputFormat::Text);
        assert!(OutputFormat::from_str("xml").is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}

/// Dashboard configuration.
///
/// Read from a TOML file. Every key has a default, so a missing file (or a
/// file that only sets a few keys) still yields a complete configuration.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::trend::TrendAxis;
use crate::logging::LogLevel;
use crate::model::DashboardError;

/// Config file looked for when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";

/// Environment variable that overrides the config file path.
pub const CONFIG_PATH_ENV: &str = "DASHBOARD_CONFIG";

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub daily_path: PathBuf,
    pub hourly_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            daily_path: PathBuf::from("submission/dashboard/day.csv"),
            hourly_path: PathBuf::from("submission/dashboard/hour.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub degree: usize,
    pub axis: TrendAxis,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            degree: 2,
            axis: TrendAxis::MonthOfYear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Empty means console only.
    pub file: String,
    pub timestamps: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: String::new(),
            timestamps: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DataConfig,
    pub trend: TrendConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl DashboardConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, DashboardError> {
        let config: DashboardConfig =
            toml::from_str(contents).map_err(|e| DashboardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or returns the defaults when the file does not exist.
    ///
    /// Returns whether the file was found alongside the config so the caller
    /// can log it once the logger is up.
    pub fn load_or_default(path: &Path) -> Result<(Self, bool), DashboardError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok((Self::from_toml_str(&contents)?, true)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok((Self::default(), false)),
            Err(e) => Err(DashboardError::Config(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn validate(&self) -> Result<(), DashboardError> {
        if self.trend.degree == 0 {
            return Err(DashboardError::Config(
                "trend.degree must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Resolves the config file path: explicit argument, then `DASHBOARD_CONFIG`
/// (from the environment or a `.env` file), then `dashboard.toml`.
pub fn resolve_config_path(cli_arg: Option<String>) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }
    dotenv::dotenv().ok();
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.trend.degree, 2);
        assert_eq!(config.trend.axis, TrendAxis::MonthOfYear);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_partial_document_overrides_only_given_keys() {
        let config = DashboardConfig::from_toml_str(
            r#"
            [data]
            daily_path = "data/day.csv"

            [trend]
            axis = "continuous"

            [output]
            format = "json"

            [logging]
            level = "debug"
            timestamps = true
            "#,
        )
        .unwrap();

        assert_eq!(config.data.daily_path, PathBuf::from("data/day.csv"));
        assert_eq!(config.data.hourly_path, DataConfig::default().hourly_path);
        assert_eq!(config.trend.axis, TrendAxis::Continuous);
        assert_eq!(config.trend.degree, 2);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.logging.timestamps);
    }

    #[test]
    fn test_malformed_document_is_config_error() {
        let err = DashboardConfig::from_toml_str("[trend]\naxis = \"sideways\"").unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)), "got {:?}", err);
    }

    #[test]
    fn test_zero_degree_is_rejected() {
        let err = DashboardConfig::from_toml_str("[trend]\ndegree = 0").unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let (config, found) =
            DashboardConfig::load_or_default(Path::new("/nonexistent/dashboard.toml")).unwrap();
        assert!(!found);
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_explicit_path_wins() {
        assert_eq!(
            resolve_config_path(Some("custom.toml".to_string())),
            PathBuf::from("custom.toml")
        );
    }
}

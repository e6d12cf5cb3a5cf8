use std::{fs, path::{Path, PathBuf}};

use serde::Deserialize;

use crate::error::ConfigError;

/// Where the pipeline reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub source_path: PathBuf,
    pub export_path: PathBuf,
    pub report_path: PathBuf,
    /// `None` disables chart rendering.
    pub chart_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_path: PathBuf::from("sample_weather_data.csv"),
            export_path: PathBuf::from("cleaned_weather_data.csv"),
            report_path: PathBuf::from("weather_summary.md"),
            chart_dir: Some(PathBuf::from("plots")),
        }
    }
}

impl PipelineConfig {
    /// Keys missing from the file keep their default value.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = PipelineConfig::from_toml_str(
            r#"
            source_path = "data/2024.csv"
            chart_dir = "out/charts"
            "#,
        )
        .unwrap();

        assert_eq!(config.source_path, PathBuf::from("data/2024.csv"));
        assert_eq!(config.chart_dir, Some(PathBuf::from("out/charts")));
        assert_eq!(config.export_path, PathBuf::from("cleaned_weather_data.csv"));
        assert_eq!(config.report_path, PathBuf::from("weather_summary.md"));
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(PipelineConfig::from_toml_str("").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn unknown_key() {
        let err = PipelineConfig::from_toml_str("sourcepath = \"x.csv\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}

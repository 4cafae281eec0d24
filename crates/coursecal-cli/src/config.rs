//! CLI configuration.
//!
//! Read from `~/.config/coursecal/config.toml` unless `--config` points
//! elsewhere. Every field is optional.
//!
//! ```toml
//! debug = false
//! log_format = "compact"
//!
//! [pipeline]
//! default_year = 2026
//! uid_namespace = "cs101.example.edu"
//! extra_policy_keywords = ["lab safety"]
//! ```

use std::path::PathBuf;

use coursecal_core::{LogFormat, PipelineConfig};
use serde::{Deserialize, Serialize};

/// Configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Enable debug logging.
    pub debug: bool,

    /// Log format: `pretty`, `compact` or `json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<String>,

    /// Pipeline settings.
    pub pipeline: PipelineConfig,
}

impl CliConfig {
    /// Loads configuration from the default path, or defaults when no file exists.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("coursecal")
            .join("config.toml")
    }

    /// Pipeline settings with the command-line year applied.
    pub fn pipeline_config(&self, year: Option<i32>) -> PipelineConfig {
        match year {
            Some(year) => self.pipeline.clone().with_default_year(year),
            None => self.pipeline.clone(),
        }
    }

    /// Resolves the log format, the command-line value taking precedence.
    pub fn log_format(&self, flag: Option<&str>) -> Result<LogFormat, String> {
        match flag.or(self.log_format.as_deref()) {
            Some(name) => {
                LogFormat::from_name(name).ok_or_else(|| format!("unknown log format: {}", name))
            }
            None => Ok(LogFormat::default()),
        }
    }
}

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::{LogConfig, LogFormat, LogLevel};

/// Main application configuration
///
/// Only presentation and logging are configurable. Classification thresholds
/// and phrase tables are fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Logging settings
    pub logging: LogConfig,

    /// Insight rendering settings
    pub output: OutputSettings,
}

/// Configuration metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// How insights are rendered by the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub format: OutputFormat,

    /// Colorize headline and statuses
    pub color: bool,

    /// Print the per-component table
    pub show_breakdown: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Headline, table, recommendation
    Text,
    /// Pretty-printed insight JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
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

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            logging: LogConfig::default(),
            output: OutputSettings::default(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            show_breakdown: true,
        }
    }
}

/// Keys accepted by [`AppConfig::get`] and [`AppConfig::set`]
pub const CONFIG_KEYS: [&str; 6] = [
    "output.format",
    "output.color",
    "output.show_breakdown",
    "logging.level",
    "logging.format",
    "logging.file",
];

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".restrs")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(_) => {
                tracing::debug!("Config file not found, using defaults: {}", config_path.display());
                Self::default()
            }
        }
    }

    /// Output settings for one invocation, with an optional format override
    ///
    /// The override never touches `self`, so a later save keeps the stored format.
    pub fn output_with(&self, format: Option<OutputFormat>) -> OutputSettings {
        let mut output = self.output.clone();
        if let Some(format) = format {
            output.format = format;
        }
        output
    }

    /// Read a dotted configuration key
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "output.format" => self.output.format.to_string(),
            "output.color" => self.output.color.to_string(),
            "output.show_breakdown" => self.output.show_breakdown.to_string(),
            "logging.level" => self.logging.level.to_string(),
            "logging.format" => self.logging.format.to_string(),
            "logging.file" => self
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            _ => return Err(anyhow!("Unknown configuration key: {}", key)),
        };
        Ok(value)
    }

    /// Set a dotted configuration key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "output.format" => {
                self.output.format = value.parse::<OutputFormat>().map_err(|e| anyhow!(e))?
            }
            "output.color" => {
                self.output.color = value
                    .parse::<bool>()
                    .with_context(|| format!("Expected true or false for {}", key))?
            }
            "output.show_breakdown" => {
                self.output.show_breakdown = value
                    .parse::<bool>()
                    .with_context(|| format!("Expected true or false for {}", key))?
            }
            "logging.level" => {
                self.logging.level = value.parse::<LogLevel>().map_err(|e| anyhow!(e))?
            }
            "logging.format" => {
                self.logging.format = value.parse::<LogFormat>().map_err(|e| anyhow!(e))?
            }
            // Empty or "none" turns the file log off
            "logging.file" => {
                self.logging.file = match value {
                    "" | "none" => None,
                    path => Some(PathBuf::from(path)),
                }
            }
            _ => return Err(anyhow!("Unknown configuration key: {}", key)),
        }
        Ok(())
    }

    /// All keys with their current values
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).ok().map(|value| (*key, value)))
            .collect()
    }
}

//! Diagnostics output for the insight CLI
//!
//! The engines emit `tracing` events: one `debug!` per classified component,
//! a `warn!` for each recovery component dropped for a missing reading, and an
//! `info!` naming the weakest/limiting metric once an insight is built. This
//! module decides where those events go.
//!
//! Events are written to stderr so stdout carries only the rendered insight.
//! When `logging.file` is configured, a JSON copy is also appended to a daily
//! rolling file next to it.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Fallback prefix when the configured file path has no usable file name
const DEFAULT_LOG_FILE: &str = "restrs.log";

/// Logging configuration (the `[logging]` table of the config file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Minimum level for `restrs` events
    pub level: LogLevel,

    /// Format of the stderr output
    pub format: LogFormat,

    /// Daily rolling JSON log file, if any
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Compact,
            file: None,
        }
    }
}

impl LogConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub fn directive(&self) -> String {
        format!("restrs={}", self.level)
    }

    /// Directory and file prefix for the rolling appender
    ///
    /// A bare file name rolls in the current directory.
    pub fn rolling_target(&self) -> Option<(PathBuf, String)> {
        let path = self.file.as_ref()?;

        let directory = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let prefix = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_LOG_FILE)
            .to_string();

        Some((directory, prefix))
    }
}

/// Verbosity of insight diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    const ORDERED: [LogLevel; 5] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Raise `base` by one level per `-v`, capped at trace
    pub fn from_verbosity(base: LogLevel, verbose: u8) -> Self {
        let start = Self::ORDERED.iter().position(|l| *l == base).unwrap_or(1);
        Self::ORDERED[(start + verbose as usize).min(Self::ORDERED.len() - 1)]
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

/// Format of the stderr diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human-readable
    Pretty,
    /// One JSON object per event
    Json,
    /// One short line per event
    Compact,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
            LogFormat::Compact => f.write_str("compact"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Install the global subscriber for the CLI
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.directive()));

    let stderr_layer = match config.format {
        LogFormat::Pretty => fmt_layer::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Json => fmt_layer::layer().json().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt_layer::layer()
            .compact()
            .without_time()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let file_layer = match config.rolling_target() {
        Some((directory, prefix)) => {
            fs::create_dir_all(&directory).with_context(|| {
                format!("Failed to create log directory: {}", directory.display())
            })?;
            let appender = tracing_appender::rolling::daily(directory, prefix);
            Some(fmt_layer::layer().json().with_ansi(false).with_writer(appender))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    tracing::debug!(
        level = %config.level,
        format = %config.format,
        file = ?config.file,
        "Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("Pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Compact.to_string(), "compact");
    }

    #[test]
    fn test_verbosity_mapping() {
        assert_eq!(LogLevel::from_verbosity(LogLevel::Warn, 0), LogLevel::Warn);
        assert_eq!(LogLevel::from_verbosity(LogLevel::Warn, 1), LogLevel::Info);
        assert_eq!(LogLevel::from_verbosity(LogLevel::Warn, 2), LogLevel::Debug);
        assert_eq!(LogLevel::from_verbosity(LogLevel::Warn, 9), LogLevel::Trace);
        assert_eq!(LogLevel::from_verbosity(LogLevel::Info, 1), LogLevel::Debug);
    }

    #[test]
    fn test_directive_targets_crate() {
        let config = LogConfig {
            level: LogLevel::Debug,
            ..LogConfig::default()
        };
        assert_eq!(config.directive(), "restrs=debug");
        assert_eq!(LogConfig::default().directive(), "restrs=warn");
    }

    #[test]
    fn test_rolling_target() {
        assert!(LogConfig::default().rolling_target().is_none());

        let config = LogConfig {
            file: Some(PathBuf::from("/var/log/restrs/insights.log")),
            ..LogConfig::default()
        };
        assert_eq!(
            config.rolling_target(),
            Some((PathBuf::from("/var/log/restrs"), "insights.log".to_string()))
        );

        let config = LogConfig {
            file: Some(PathBuf::from("insights.log")),
            ..LogConfig::default()
        };
        assert_eq!(
            config.rolling_target(),
            Some((PathBuf::from("."), "insights.log".to_string()))
        );
    }

    #[test]
    fn test_log_config_toml_round_trip() {
        let config = LogConfig {
            level: LogLevel::Info,
            format: LogFormat::Json,
            file: Some(PathBuf::from("logs/restrs.log")),
        };
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("level = \"info\""));
        let back: LogConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back, config);
    }
}

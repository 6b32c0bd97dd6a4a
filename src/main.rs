use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::*;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing::{error, info, warn, Level};

use restrs::config::OutputSettings;
use restrs::{
    generate_recovery_insight, generate_sleep_insight, logging, AppConfig, Insight, LogLevel,
    OutputFormat, QualitativeStatus, RecoveryScoreResult, RestRsError, SleepScoreResult,
};

/// RestRS - Sleep and Recovery Insight CLI
///
/// Turns finalized sleep and recovery score results into a headline, a
/// per-metric breakdown, and a recommendation.
#[derive(Parser)]
#[command(name = "restrs")]
#[command(author = "RestRS Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Sleep and Recovery Insight CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format override (text, json)
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a sleep insight from a sleep score result
    Sleep {
        /// Score result JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Generate a recovery insight from a recovery score result
    Recovery {
        /// Score result JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (KEY=VALUE)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,
    },
}

/// What `restrs config` does; listing is the default
#[derive(Debug, PartialEq, Eq)]
enum ConfigAction {
    List,
    Set(String),
    Get(String),
}

impl ConfigAction {
    fn from_flags(list: bool, set: Option<String>, get: Option<String>) -> Self {
        match (list, set, get) {
            (true, _, _) => ConfigAction::List,
            (false, Some(key_value), _) => ConfigAction::Set(key_value),
            (false, None, Some(key)) => ConfigAction::Get(key),
            (false, None, None) => ConfigAction::List,
        }
    }
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Optimal")]
    optimal: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Analysis")]
    analysis: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::default_config_path);
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(),
    };

    let mut log_config = config.logging.clone();
    log_config.level = LogLevel::from_verbosity(log_config.level, cli.verbose);
    logging::init_logging(&log_config)?;

    let output = config.output_with(cli.format);
    if !output.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Sleep { file } => {
            let result: SleepScoreResult = read_score_result(&file)?;
            let insight = generate_sleep_insight(&result).map_err(report)?;
            render(&insight, "Sleep", result.date, &output)?;
        }

        Commands::Recovery { file } => {
            let result: RecoveryScoreResult = read_score_result(&file)?;
            let insight = generate_recovery_insight(&result).map_err(report)?;
            render(&insight, "Recovery", result.date, &output)?;
        }

        Commands::Config { list, set, get } => match ConfigAction::from_flags(list, set, get) {
            ConfigAction::List => {
                println!("{}", "Configuration:".white().bold());
                for (key, value) in config.entries() {
                    println!("  {} = {}", key, value);
                }
            }
            ConfigAction::Set(key_value) => {
                let (key, value) = key_value
                    .split_once('=')
                    .ok_or_else(|| anyhow!("Expected KEY=VALUE, got: {}", key_value))?;
                config.set(key.trim(), value.trim())?;
                config.save_to_file(&config_path)?;
                info!(key, value, path = %config_path.display(), "Configuration updated");
                println!("{}", format!("✓ {} = {}", key.trim(), value.trim()).green());
            }
            ConfigAction::Get(key) => {
                println!("{}", config.get(&key)?);
            }
        },
    }

    Ok(())
}

fn read_score_result<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read score result: {}", path.display()))?;
    let result = serde_json::from_str(&content)
        .map_err(RestRsError::from)
        .map_err(report)
        .with_context(|| format!("Failed to parse score result: {}", path.display()))?;
    Ok(result)
}

/// Log an engine error at its severity and turn it into a user-facing error
fn report(err: RestRsError) -> anyhow::Error {
    let level = err.severity().to_tracing_level();
    if level == Level::ERROR {
        error!(error = %err, "Insight generation failed");
    } else if level == Level::WARN {
        warn!(error = %err, "Insight generation failed");
    } else {
        info!(error = %err, "Insight generation skipped");
    }
    anyhow!(err.user_message())
}

fn render(insight: &Insight, title: &str, date: NaiveDate, settings: &OutputSettings) -> Result<()> {
    match settings.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(insight)?);
        }
        OutputFormat::Text => {
            println!("{}", format!("{} insight for {}", title, date).bold());
            println!();

            let headline = match insight.overall_status() {
                Some(QualitativeStatus::Optimal) | Some(QualitativeStatus::Good) => {
                    insight.headline.as_str().green()
                }
                Some(QualitativeStatus::Fair) => insight.headline.as_str().yellow(),
                _ => insight.headline.as_str().red(),
            };
            println!("{}", headline.bold());

            if settings.show_breakdown {
                let rows: Vec<BreakdownRow> = insight
                    .component_breakdown
                    .iter()
                    .map(|c| BreakdownRow {
                        metric: c.metric_name.clone(),
                        value: c.user_value.clone(),
                        optimal: c.optimal_range.clone(),
                        status: c.status.to_string(),
                        analysis: c.analysis.clone(),
                    })
                    .collect();

                println!();
                println!("{}", Table::new(rows).with(Style::rounded()));
            }

            println!();
            println!("{} {}", "Recommendation:".cyan().bold(), insight.recommendation);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_action(args: &[&str]) -> ConfigAction {
        match Cli::try_parse_from(args.iter().copied()).unwrap().command {
            Commands::Config { list, set, get } => ConfigAction::from_flags(list, set, get),
            _ => panic!("expected the config subcommand"),
        }
    }

    #[test]
    fn test_bare_config_lists() {
        assert_eq!(config_action(&["restrs", "config"]), ConfigAction::List);
        assert_eq!(config_action(&["restrs", "config", "--list"]), ConfigAction::List);
    }

    #[test]
    fn test_config_set_and_get() {
        assert_eq!(
            config_action(&["restrs", "config", "--set", "output.color=false"]),
            ConfigAction::Set("output.color=false".to_string())
        );
        assert_eq!(
            config_action(&["restrs", "config", "--get", "logging.level"]),
            ConfigAction::Get("logging.level".to_string())
        );
    }

    #[test]
    fn test_format_flag_leaves_config_untouched() {
        let cli = Cli::try_parse_from(["restrs", "--format", "json", "config", "--set", "output.color=false"])
            .unwrap();
        let config = AppConfig::default();

        let output = config.output_with(cli.format);
        assert_eq!(output.format, OutputFormat::Json);
        assert_eq!(config.output.format, OutputFormat::Text);
    }
}

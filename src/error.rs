//! Unified error hierarchy for RestRS
//!
//! The insight engines are total over well-formed input. Everything in this
//! module describes input that is *not* well formed, plus the I/O and
//! configuration failures the binary can run into around the engines.

use thiserror::Error;

/// Top-level error type for all RestRS operations
#[derive(Debug, Error)]
pub enum RestRsError {
    /// Score result failed an input precondition
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Insight could not be assembled from the classified components
    #[error("Insight error: {0}")]
    Insight(#[from] InsightError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Input precondition violations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Range whose lower bound exceeds its upper bound
    #[error("Invalid range: lower bound {lower} exceeds upper bound {upper}")]
    InvalidRange { lower: f64, upper: f64 },

    /// NaN or infinite input
    #[error("Non-finite value for {field}: {value}")]
    NonFinite { field: String, value: f64 },

    /// Negative duration or count
    #[error("Negative value for {field}: {value}")]
    Negative { field: String, value: f64 },

    /// Value outside its domain (e.g. a score above 100)
    #[error("Value for {field} out of range: {value} (valid range: {min}-{max})")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Baseline of zero makes a relative delta undefined
    #[error("Zero baseline for {metric}")]
    ZeroBaseline { metric: String },

    /// Sleep result with no recorded sleep time
    #[error("No sleep recorded: total time asleep is zero")]
    NoSleepRecorded,
}

/// Insight assembly errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsightError {
    /// Nothing left to classify after filtering
    #[error("No classifiable components for {engine} insight")]
    NoComponents { engine: String },
}

/// Result type alias for RestRS operations
pub type Result<T> = std::result::Result<T, RestRsError>;

impl ValidationError {
    /// Reject NaN and infinities
    pub fn ensure_finite(field: &str, value: f64) -> std::result::Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ValidationError::NonFinite {
                field: field.to_string(),
                value,
            })
        }
    }

    /// Reject non-finite and negative values
    pub fn ensure_non_negative(field: &str, value: f64) -> std::result::Result<f64, Self> {
        let value = Self::ensure_finite(field, value)?;
        if value < 0.0 {
            return Err(ValidationError::Negative {
                field: field.to_string(),
                value,
            });
        }
        Ok(value)
    }

    /// Reject values outside `[min, max]`
    pub fn ensure_within(
        field: &str,
        value: f64,
        min: f64,
        max: f64,
    ) -> std::result::Result<f64, Self> {
        let value = Self::ensure_finite(field, value)?;
        if value < min || value > max {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min,
                max,
            });
        }
        Ok(value)
    }
}

impl RestRsError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RestRsError::Validation(ValidationError::NoSleepRecorded) => ErrorSeverity::Info,
            RestRsError::Validation(_) => ErrorSeverity::Warning,
            RestRsError::Insight(_) => ErrorSeverity::Warning,
            RestRsError::Io(_) => ErrorSeverity::Error,
            RestRsError::Serialization(_) => ErrorSeverity::Error,
            RestRsError::Configuration(_) => ErrorSeverity::Critical,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            RestRsError::Validation(ValidationError::NoSleepRecorded) => {
                "No sleep was recorded for this night, so there is nothing to analyze.".to_string()
            }
            RestRsError::Validation(ValidationError::ZeroBaseline { metric }) => {
                format!(
                    "Your {} baseline is not established yet. Keep wearing your device to build one.",
                    metric
                )
            }
            RestRsError::Insight(InsightError::NoComponents { engine }) => {
                format!("Not enough data to build a {} insight.", engine)
            }
            RestRsError::Serialization(_) => {
                "The score result could not be read. Please check the input file format.".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}

// Library interface for RestRS modules
// Integration tests and the CLI go through this crate root

pub mod classification;
pub mod config;
pub mod error;
pub mod format;
pub mod insight;
pub mod logging;
pub mod models;
pub mod recovery;
pub mod sleep;
pub mod status;

// Re-export commonly used types for convenience
pub use classification::{classify_in_range, classify_score, ClosedRange};
pub use config::{AppConfig, OutputFormat};
pub use error::{RestRsError, Result};
pub use insight::{ComponentInsight, Insight, RecoveryInsight, SleepInsight};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::{RecoveryComponentScore, RecoveryScoreResult, SleepScoreResult};
pub use recovery::{generate_recovery_insight, RecoveryBand, RecoveryInsightEngine};
pub use sleep::{generate_sleep_insight, SleepInsightEngine};
pub use status::QualitativeStatus;

//! Score result input models
//!
//! A score result is the immutable output of one finalized scoring run. The
//! scoring itself happens upstream; the insight engines only read these
//! records.

use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Finalized sleep scoring run for one night
///
/// # Units
///
/// - `time_asleep`, `deep_sleep`, `rem_sleep`: seconds
/// - `sleep_efficiency`: ratio 0.0-1.0 (time asleep / time in bed)
/// - `time_to_fall_asleep`: minutes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepScoreResult {
    /// Night the score belongs to (wake-up date)
    pub date: NaiveDate,

    /// Total time asleep in seconds
    pub time_asleep: f64,

    /// Deep (slow-wave) sleep in seconds
    pub deep_sleep: f64,

    /// REM sleep in seconds
    pub rem_sleep: f64,

    /// Sleep efficiency ratio (0.0-1.0)
    pub sleep_efficiency: f64,

    /// Sleep onset latency in minutes
    pub time_to_fall_asleep: f64,
}

impl SleepScoreResult {
    /// Check the record is well formed before interpreting it
    pub fn validate(&self) -> Result<(), ValidationError> {
        let time_asleep = ValidationError::ensure_non_negative("time_asleep", self.time_asleep)?;
        ValidationError::ensure_non_negative("deep_sleep", self.deep_sleep)?;
        ValidationError::ensure_non_negative("rem_sleep", self.rem_sleep)?;
        ValidationError::ensure_within("sleep_efficiency", self.sleep_efficiency, 0.0, 1.0)?;
        ValidationError::ensure_non_negative("time_to_fall_asleep", self.time_to_fall_asleep)?;

        if time_asleep == 0.0 {
            return Err(ValidationError::NoSleepRecorded);
        }

        Ok(())
    }

    /// Total time asleep in minutes
    pub fn time_asleep_minutes(&self) -> f64 {
        self.time_asleep / 60.0
    }
}

/// Sub-result for one recovery component
///
/// `current_value` and `baseline` are in the metric's native unit (ms for
/// HRV, bpm for resting heart rate). Either may be missing when the upstream
/// collector had no reading or no established baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryComponentScore {
    pub current_value: Option<f64>,
    pub baseline: Option<f64>,

    /// Component score (0-100)
    pub score: f64,
}

impl RecoveryComponentScore {
    pub fn new(current_value: Option<f64>, baseline: Option<f64>, score: f64) -> Self {
        Self {
            current_value,
            baseline,
            score,
        }
    }

    /// Component that carries only a score (e.g. the sleep sub-score)
    pub fn score_only(score: f64) -> Self {
        Self::new(None, None, score)
    }

    /// Current value and baseline, if both are present
    pub fn reading(&self) -> Option<(f64, f64)> {
        match (self.current_value, self.baseline) {
            (Some(current), Some(baseline)) => Some((current, baseline)),
            _ => None,
        }
    }

    /// Validate the component; `metric` names it in error messages
    pub fn validate(&self, metric: &str) -> Result<(), ValidationError> {
        ValidationError::ensure_within(&format!("{}.score", metric), self.score, 0.0, 100.0)?;

        if let Some(current) = self.current_value {
            ValidationError::ensure_non_negative(&format!("{}.current_value", metric), current)?;
        }
        if let Some(baseline) = self.baseline {
            ValidationError::ensure_non_negative(&format!("{}.baseline", metric), baseline)?;
        }

        if let Some((_, baseline)) = self.reading() {
            if baseline == 0.0 {
                return Err(ValidationError::ZeroBaseline {
                    metric: metric.to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Finalized physiological recovery scoring run for one morning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveryScoreResult {
    pub date: NaiveDate,

    /// Heart rate variability (ms)
    pub hrv: RecoveryComponentScore,

    /// Resting heart rate (bpm)
    pub resting_heart_rate: RecoveryComponentScore,

    /// Sleep sub-score; only `score` is read
    pub sleep: RecoveryComponentScore,

    /// Physiological stress. Scored upstream, never read here, so not validated.
    pub stress: RecoveryComponentScore,

    /// Aggregate recovery score (0-100)
    pub final_score: f64,
}

impl RecoveryScoreResult {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.hrv.validate("Heart Rate Variability")?;
        self.resting_heart_rate.validate("Resting Heart Rate")?;
        self.sleep.validate("Sleep Quality")?;
        ValidationError::ensure_within("final_score", self.final_score, 0.0, 100.0)?;
        Ok(())
    }
}

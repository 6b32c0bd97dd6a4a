//! Sleep insight generation
//!
//! Turns a finalized [`SleepScoreResult`] into a [`SleepInsight`]. Five metrics
//! are classified against optimal bands, in a fixed order:
//!
//! | Metric     | Optimal band                         | Unit    |
//! |------------|--------------------------------------|---------|
//! | Duration   | 420-540                              | minutes |
//! | Deep Sleep | 13-23% of total sleep                | seconds |
//! | REM Sleep  | 20-25% of total sleep (>= 2h always) | seconds |
//! | Efficiency | 0.90-0.95                            | ratio   |
//! | Onset      | 0-15                                 | minutes |
//!
//! The deep and REM bands scale with how long the user actually slept, so a
//! short night is judged on stage *proportions* rather than absolute time.

use crate::classification::{classify_in_range, ClosedRange};
use crate::error::{InsightError, Result};
use crate::format::{format_duration_minutes, format_duration_seconds, format_percent, format_range};
use crate::insight::{ComponentInsight, PhraseTable, SleepInsight};
use crate::models::SleepScoreResult;
use crate::status::{least_severe, most_severe, QualitativeStatus};
use tracing::{debug, info};

pub const DURATION: &str = "Duration";
pub const DEEP_SLEEP: &str = "Deep Sleep";
pub const REM_SLEEP: &str = "REM Sleep";
pub const EFFICIENCY: &str = "Efficiency";
pub const ONSET: &str = "Onset";

/// Evaluation order of the breakdown
pub const SLEEP_METRICS: [&str; 5] = [DURATION, DEEP_SLEEP, REM_SLEEP, EFFICIENCY, ONSET];

/// Deep sleep band as a fraction of total sleep
pub const DEEP_SLEEP_FRACTION: (f64, f64) = (0.13, 0.23);

/// REM band as a fraction of total sleep
pub const REM_SLEEP_FRACTION: (f64, f64) = (0.20, 0.25);

/// REM at or above this many seconds is Optimal regardless of the band
pub const REM_OVERRIDE_SECONDS: f64 = 7200.0;

/// Total sleep band in minutes
pub const DURATION_MINUTES: (f64, f64) = (420.0, 540.0);

/// Sleep efficiency band (ratio)
pub const EFFICIENCY_RATIO: (f64, f64) = (0.90, 0.95);

/// Onset latency band in minutes
pub const ONSET_MINUTES: (f64, f64) = (0.0, 15.0);

pub const CONGRATULATORY_HEADLINE: &str =
    "Excellent night! Every sleep metric landed in its optimal range.";

/// Positive phrase for the strongest metric
pub const POSITIVE_PHRASES: PhraseTable = PhraseTable::new(
    &[
        (EFFICIENCY, "sleep was highly efficient"),
        (DURATION, "sleep duration was on point"),
        (DEEP_SLEEP, "Deep Sleep was strong"),
        (REM_SLEEP, "REM Sleep was strong"),
        (ONSET, "you fell asleep quickly"),
    ],
    "overall sleep quality was solid",
);

/// Negative phrase for the weakest metric
pub const NEGATIVE_PHRASES: PhraseTable = PhraseTable::new(
    &[
        (DEEP_SLEEP, "a lack of Deep Sleep may impact physical recovery today"),
        (REM_SLEEP, "low REM Sleep could affect mental clarity"),
        (DURATION, "short sleep duration may leave you under-rested"),
        (EFFICIENCY, "restlessness reduced your sleep efficiency"),
        (ONSET, "long sleep onset delayed restorative processes"),
    ],
    "imbalances could impact your day",
);

/// Actionable recommendation for the weakest metric
pub const RECOMMENDATIONS: PhraseTable = PhraseTable::new(
    &[
        (
            DEEP_SLEEP,
            "Support Deep Sleep by keeping your bedroom cool and avoiding alcohol or heavy meals close to bedtime.",
        ),
        (
            DURATION,
            "Aim for 7-9 hours of sleep by setting a consistent bedtime and protecting your sleep window.",
        ),
        (
            REM_SLEEP,
            "Protect REM Sleep by keeping a regular wake time and limiting caffeine after midday.",
        ),
        (
            EFFICIENCY,
            "Reduce nighttime disruptions by keeping your room dark and quiet and saving the bed for sleep.",
        ),
        (
            ONSET,
            "Build a wind-down routine and put screens away 30-60 minutes before bed to fall asleep faster.",
        ),
    ],
    "Maintain good sleep hygiene with a consistent schedule and a cool, dark, quiet bedroom.",
);

/// Per-status analysis sentence for a metric
fn analysis_sentence(metric_name: &str, status: QualitativeStatus) -> String {
    match status {
        QualitativeStatus::Optimal => {
            format!("Your {} was within the optimal range.", metric_name)
        }
        QualitativeStatus::Good => {
            format!("Your {} was just outside the optimal range.", metric_name)
        }
        QualitativeStatus::Fair => {
            format!("Your {} was moderately outside the optimal range.", metric_name)
        }
        QualitativeStatus::Poor => {
            format!("Your {} was well outside the optimal range.", metric_name)
        }
    }
}

/// Optimal bands for one night
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepBands {
    /// Minutes
    pub duration: ClosedRange,
    /// Seconds, scaled to total sleep
    pub deep_sleep: ClosedRange,
    /// Seconds, scaled to total sleep
    pub rem_sleep: ClosedRange,
    pub efficiency: ClosedRange,
    /// Minutes
    pub onset: ClosedRange,
}

impl SleepBands {
    /// Derive the bands for a night with `time_asleep` seconds of sleep
    pub fn personalized(time_asleep: f64) -> Result<Self> {
        Ok(Self {
            duration: ClosedRange::new(DURATION_MINUTES.0, DURATION_MINUTES.1)?,
            deep_sleep: ClosedRange::new(
                DEEP_SLEEP_FRACTION.0 * time_asleep,
                DEEP_SLEEP_FRACTION.1 * time_asleep,
            )?,
            rem_sleep: ClosedRange::new(
                REM_SLEEP_FRACTION.0 * time_asleep,
                REM_SLEEP_FRACTION.1 * time_asleep,
            )?,
            efficiency: ClosedRange::new(EFFICIENCY_RATIO.0, EFFICIENCY_RATIO.1)?,
            onset: ClosedRange::new(ONSET_MINUTES.0, ONSET_MINUTES.1)?,
        })
    }
}

/// Sleep insight engine
pub struct SleepInsightEngine;

impl SleepInsightEngine {
    /// Generate the insight for one sleep score result
    ///
    /// Deterministic: the same input always yields the same insight.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed input (NaN, negative
    /// durations, efficiency outside 0-1, zero total sleep).
    pub fn generate_sleep_insight(result: &SleepScoreResult) -> Result<SleepInsight> {
        result.validate()?;

        let bands = SleepBands::personalized(result.time_asleep)?;
        let components = Self::classify_components(result, &bands);

        let weakest = most_severe(&components, |c| c.status).ok_or_else(|| {
            InsightError::NoComponents {
                engine: "sleep".to_string(),
            }
        })?;
        let strongest = least_severe(&components, |c| c.status).ok_or_else(|| {
            InsightError::NoComponents {
                engine: "sleep".to_string(),
            }
        })?;

        let headline = Self::headline(weakest, strongest);
        let recommendation = RECOMMENDATIONS.lookup(&weakest.metric_name).to_string();

        info!(
            date = %result.date,
            weakest = %weakest.metric_name,
            weakest_status = %weakest.status,
            strongest = %strongest.metric_name,
            "Generated sleep insight"
        );

        Ok(SleepInsight {
            headline,
            component_breakdown: components,
            recommendation,
        })
    }

    /// Classify the five metrics in evaluation order
    fn classify_components(result: &SleepScoreResult, bands: &SleepBands) -> Vec<ComponentInsight> {
        let duration_minutes = result.time_asleep_minutes();

        let rem_status = if result.rem_sleep >= REM_OVERRIDE_SECONDS {
            QualitativeStatus::Optimal
        } else {
            classify_in_range(result.rem_sleep, &bands.rem_sleep)
        };

        let rows = [
            (
                DURATION,
                format_duration_minutes(duration_minutes),
                format_range(
                    &format_duration_minutes(bands.duration.lower),
                    &format_duration_minutes(bands.duration.upper),
                ),
                classify_in_range(duration_minutes, &bands.duration),
            ),
            (
                DEEP_SLEEP,
                format_duration_seconds(result.deep_sleep),
                format_range(
                    &format_duration_seconds(bands.deep_sleep.lower),
                    &format_duration_seconds(bands.deep_sleep.upper),
                ),
                classify_in_range(result.deep_sleep, &bands.deep_sleep),
            ),
            (
                REM_SLEEP,
                format_duration_seconds(result.rem_sleep),
                format_range(
                    &format_duration_seconds(bands.rem_sleep.lower),
                    &format_duration_seconds(bands.rem_sleep.upper),
                ),
                rem_status,
            ),
            (
                EFFICIENCY,
                format_percent(result.sleep_efficiency),
                format_range(
                    &format_percent(bands.efficiency.lower),
                    &format_percent(bands.efficiency.upper),
                ),
                classify_in_range(result.sleep_efficiency, &bands.efficiency),
            ),
            (
                ONSET,
                format_duration_minutes(result.time_to_fall_asleep),
                format_range(
                    &format_duration_minutes(bands.onset.lower),
                    &format_duration_minutes(bands.onset.upper),
                ),
                classify_in_range(result.time_to_fall_asleep, &bands.onset),
            ),
        ];

        rows.into_iter()
            .map(|(metric, user_value, optimal_range, status)| {
                debug!(metric, value = %user_value, %status, "Classified sleep component");
                ComponentInsight::new(
                    metric,
                    user_value,
                    optimal_range,
                    analysis_sentence(metric, status),
                    status,
                )
            })
            .collect()
    }

    fn headline(weakest: &ComponentInsight, strongest: &ComponentInsight) -> String {
        if weakest.status == QualitativeStatus::Optimal {
            return CONGRATULATORY_HEADLINE.to_string();
        }

        format!(
            "While your {}, {}.",
            POSITIVE_PHRASES.lookup(&strongest.metric_name),
            NEGATIVE_PHRASES.lookup(&weakest.metric_name)
        )
    }
}

/// Generate a sleep insight (see [`SleepInsightEngine::generate_sleep_insight`])
pub fn generate_sleep_insight(result: &SleepScoreResult) -> Result<SleepInsight> {
    SleepInsightEngine::generate_sleep_insight(result)
}

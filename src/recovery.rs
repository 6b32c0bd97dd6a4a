//! Recovery insight generation
//!
//! Turns a finalized [`RecoveryScoreResult`] into a [`RecoveryInsight`].
//!
//! # Components
//!
//! - **Heart Rate Variability**: compared to the personal baseline; higher is better.
//! - **Resting Heart Rate**: compared to the personal baseline; lower is better.
//! - **Sleep Quality**: the sleep sub-score on its own, no baseline.
//!
//! HRV and resting heart rate only appear when both a current reading and a
//! baseline exist. The physiological stress component is scored upstream but
//! left out of the breakdown.
//!
//! Component status always comes from the component's own 0-100 score
//! (90/80/65 cut points), never from the baseline delta. The sleep analysis
//! sentence uses its own 85/70/50 cut points; the two threshold sets differ
//! on purpose.

use crate::classification::{classify_score, OPTIMAL_SCORE};
use crate::error::{InsightError, Result};
use crate::format::{format_bpm, format_ms, format_percent, format_range};
use crate::insight::{ComponentInsight, PhraseTable, RecoveryInsight};
use crate::models::{RecoveryComponentScore, RecoveryScoreResult};
use crate::status::{least_severe, most_severe, QualitativeStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

pub const HEART_RATE_VARIABILITY: &str = "Heart Rate Variability";
pub const RESTING_HEART_RATE: &str = "Resting Heart Rate";
pub const SLEEP_QUALITY: &str = "Sleep Quality";
pub const PHYSIOLOGICAL_STRESS: &str = "Physiological Stress";

/// Sleep sub-score cut points for the analysis sentence
pub const SLEEP_EXCELLENT: f64 = 85.0;
pub const SLEEP_GOOD: f64 = 70.0;
pub const SLEEP_FAIR: f64 = 50.0;

pub const STABLE_HEADLINE: &str =
    "Your body is well recovered and all recovery signals are stable.";

pub const MIXED_SIGNALS_HEADLINE: &str =
    "Your recovery signals are mixed today, so listen to your body.";

/// Headline keyed by the primary limiter
pub const LIMITER_HEADLINES: PhraseTable = PhraseTable::new(
    &[
        (
            HEART_RATE_VARIABILITY,
            "Your nervous system is still under strain, which is holding back your recovery.",
        ),
        (
            RESTING_HEART_RATE,
            "An elevated resting heart rate suggests your body is working hard to recover.",
        ),
        (
            SLEEP_QUALITY,
            "Poor sleep is the main factor limiting your recovery today.",
        ),
        (
            PHYSIOLOGICAL_STRESS,
            "Elevated physiological stress is limiting your recovery today.",
        ),
    ],
    "Your recovery is below its usual level today.",
);

/// Training recommendation band, selected by the final recovery score
///
/// - Peak: 85-100
/// - Ready: 65-85
/// - Moderate: 40-65
/// - Rest: below 40
///
/// Bands are closed at the bottom and open at the top, except Peak which
/// includes 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryBand {
    Peak,
    Ready,
    Moderate,
    Rest,
}

impl RecoveryBand {
    pub fn from_score(final_score: f64) -> Self {
        match final_score {
            s if s >= 85.0 => RecoveryBand::Peak,
            s if s >= 65.0 => RecoveryBand::Ready,
            s if s >= 40.0 => RecoveryBand::Moderate,
            _ => RecoveryBand::Rest,
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RecoveryBand::Peak => {
                "You are fully recovered. Go for maximum intensity in today's training."
            }
            RecoveryBand::Ready => {
                "You are recovered enough to proceed with your training as planned."
            }
            RecoveryBand::Moderate => {
                "Your body needs more time. Reduce today's training volume by about 25%."
            }
            RecoveryBand::Rest => {
                "Take a rest day or keep activity to light movement so your body can recover."
            }
        }
    }
}

impl fmt::Display for RecoveryBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryBand::Peak => write!(f, "Peak"),
            RecoveryBand::Ready => write!(f, "Ready"),
            RecoveryBand::Moderate => write!(f, "Moderate"),
            RecoveryBand::Rest => write!(f, "Rest"),
        }
    }
}

/// Recovery insight engine
pub struct RecoveryInsightEngine;

impl RecoveryInsightEngine {
    /// Generate the insight for one recovery score result
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed input (scores outside 0-100,
    /// NaN readings, a zero baseline next to a current reading).
    pub fn generate_recovery_insight(result: &RecoveryScoreResult) -> Result<RecoveryInsight> {
        result.validate()?;

        let components = Self::classify_components(result);

        let driver = least_severe(&components, |c| c.status).ok_or_else(|| {
            InsightError::NoComponents {
                engine: "recovery".to_string(),
            }
        })?;
        let limiter = most_severe(&components, |c| c.status).ok_or_else(|| {
            InsightError::NoComponents {
                engine: "recovery".to_string(),
            }
        })?;

        let headline = Self::headline(&components, driver, limiter);
        let band = RecoveryBand::from_score(result.final_score);

        info!(
            date = %result.date,
            final_score = result.final_score,
            %band,
            driver = %driver.metric_name,
            limiter = %limiter.metric_name,
            "Generated recovery insight"
        );

        Ok(RecoveryInsight {
            headline,
            component_breakdown: components,
            recommendation: band.recommendation().to_string(),
        })
    }

    /// HRV, resting heart rate, then sleep; missing readings are dropped
    fn classify_components(result: &RecoveryScoreResult) -> Vec<ComponentInsight> {
        let candidates = [
            Self::hrv_component(&result.hrv),
            Self::resting_hr_component(&result.resting_heart_rate),
            Some(Self::sleep_component(&result.sleep)),
        ];

        candidates
            .into_iter()
            .flatten()
            .inspect(|c| debug!(metric = %c.metric_name, status = %c.status, "Classified recovery component"))
            .collect()
    }

    fn hrv_component(component: &RecoveryComponentScore) -> Option<ComponentInsight> {
        let Some((current, baseline)) = component.reading() else {
            warn!(metric = HEART_RATE_VARIABILITY, "Missing reading or baseline, skipping");
            return None;
        };

        let delta = (current - baseline) / baseline;
        let analysis = if delta >= 0.0 {
            format!(
                "Your HRV is {} above your baseline, a sign your nervous system has recovered well.",
                format_percent(delta)
            )
        } else {
            format!(
                "Your HRV is {} below your baseline, suggesting your body is still under strain.",
                format_percent(-delta)
            )
        };

        Some(ComponentInsight::new(
            HEART_RATE_VARIABILITY,
            format_ms(current),
            format!("{} (baseline)", format_ms(baseline)),
            analysis,
            classify_score(component.score),
        ))
    }

    fn resting_hr_component(component: &RecoveryComponentScore) -> Option<ComponentInsight> {
        let Some((current, baseline)) = component.reading() else {
            warn!(metric = RESTING_HEART_RATE, "Missing reading or baseline, skipping");
            return None;
        };

        // Lower is better
        let delta = (baseline - current) / baseline;
        let analysis = if delta >= 0.0 {
            format!(
                "Your resting heart rate is {} below your baseline, indicating good recovery.",
                format_percent(delta)
            )
        } else {
            format!(
                "Your resting heart rate is {} above your baseline, which can signal fatigue, stress, or illness.",
                format_percent(-delta)
            )
        };

        Some(ComponentInsight::new(
            RESTING_HEART_RATE,
            format_bpm(current),
            format!("{} (baseline)", format_bpm(baseline)),
            analysis,
            classify_score(component.score),
        ))
    }

    fn sleep_component(component: &RecoveryComponentScore) -> ComponentInsight {
        let score = component.score;
        let analysis = match score {
            s if s >= SLEEP_EXCELLENT => {
                "Excellent sleep gave your body a strong foundation for recovery."
            }
            s if s >= SLEEP_GOOD => "Good sleep supported your recovery overnight.",
            s if s >= SLEEP_FAIR => "Fair sleep may have limited how much you recovered.",
            _ => "Poor sleep is significantly hindering your recovery.",
        };

        ComponentInsight::new(
            SLEEP_QUALITY,
            format!("{}", score.round() as i64),
            format_range(&format!("{}", OPTIMAL_SCORE as i64), "100"),
            analysis,
            classify_score(score),
        )
    }

    fn headline(
        components: &[ComponentInsight],
        driver: &ComponentInsight,
        limiter: &ComponentInsight,
    ) -> String {
        if components.iter().all(|c| c.status.is_favorable()) {
            return STABLE_HEADLINE.to_string();
        }

        if driver.metric_name == limiter.metric_name {
            return MIXED_SIGNALS_HEADLINE.to_string();
        }

        LIMITER_HEADLINES.lookup(&limiter.metric_name).to_string()
    }
}

/// Generate a recovery insight (see [`RecoveryInsightEngine::generate_recovery_insight`])
pub fn generate_recovery_insight(result: &RecoveryScoreResult) -> Result<RecoveryInsight> {
    RecoveryInsightEngine::generate_recovery_insight(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RestRsError, ValidationError};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn reference_morning() -> RecoveryScoreResult {
        RecoveryScoreResult {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            hrv: RecoveryComponentScore::new(Some(70.0), Some(62.1), 92.0),
            resting_heart_rate: RecoveryComponentScore::new(Some(58.0), Some(60.4), 85.0),
            sleep: RecoveryComponentScore::score_only(60.0),
            stress: RecoveryComponentScore::score_only(40.0),
            final_score: 78.0,
        }
    }

    fn names(insight: &RecoveryInsight) -> Vec<&str> {
        insight
            .component_breakdown
            .iter()
            .map(|c| c.metric_name.as_str())
            .collect()
    }

    #[test]
    fn test_reference_morning() {
        let insight = generate_recovery_insight(&reference_morning()).unwrap();

        assert_eq!(
            names(&insight),
            vec![HEART_RATE_VARIABILITY, RESTING_HEART_RATE, SLEEP_QUALITY]
        );

        let hrv = insight.component(HEART_RATE_VARIABILITY).unwrap();
        assert_eq!(hrv.status, QualitativeStatus::Optimal);
        assert_eq!(hrv.user_value, "70 ms");
        assert_eq!(hrv.optimal_range, "62 ms (baseline)");
        assert!(hrv.analysis.starts_with("Your HRV is 13% above your baseline"));

        let rhr = insight.component(RESTING_HEART_RATE).unwrap();
        assert_eq!(rhr.status, QualitativeStatus::Good);
        assert_eq!(rhr.user_value, "58 bpm");
        assert!(rhr.analysis.starts_with("Your resting heart rate is 4% below your baseline"));

        let sleep = insight.component(SLEEP_QUALITY).unwrap();
        assert_eq!(sleep.status, QualitativeStatus::Poor);
        assert_eq!(sleep.user_value, "60");
        assert_eq!(sleep.optimal_range, "90 - 100");
        assert_eq!(sleep.analysis, "Fair sleep may have limited how much you recovered.");

        assert_eq!(insight.headline, LIMITER_HEADLINES.lookup(SLEEP_QUALITY));
        assert_eq!(insight.recommendation, RecoveryBand::Ready.recommendation());
    }

    #[test]
    fn test_stress_is_never_surfaced() {
        let insight = generate_recovery_insight(&reference_morning()).unwrap();
        assert!(insight.component(PHYSIOLOGICAL_STRESS).is_none());
    }

    #[test]
    fn test_unusual_stress_reading_still_yields_insight() {
        let mut morning = reference_morning();
        morning.stress = RecoveryComponentScore::new(Some(3.0), Some(0.0), 50.0);

        let insight = generate_recovery_insight(&morning).unwrap();
        assert_eq!(
            insight,
            generate_recovery_insight(&reference_morning()).unwrap()
        );
    }

    #[test]
    fn test_resting_heart_rate_limits_recovery() {
        let mut morning = reference_morning();
        morning.hrv.score = 92.0;
        morning.resting_heart_rate.score = 70.0;
        morning.sleep = RecoveryComponentScore::score_only(88.0);

        let insight = generate_recovery_insight(&morning).unwrap();
        let statuses: Vec<QualitativeStatus> =
            insight.component_breakdown.iter().map(|c| c.status).collect();
        assert_eq!(
            statuses,
            vec![
                QualitativeStatus::Optimal,
                QualitativeStatus::Fair,
                QualitativeStatus::Good
            ]
        );

        assert_eq!(insight.weakest().unwrap().metric_name, RESTING_HEART_RATE);
        assert_eq!(insight.strongest().unwrap().metric_name, HEART_RATE_VARIABILITY);
        assert_eq!(insight.headline, LIMITER_HEADLINES.lookup(RESTING_HEART_RATE));
        assert_ne!(insight.headline, LIMITER_HEADLINES.default_phrase());
    }

    #[test]
    fn test_missing_baseline_drops_component() {
        let mut morning = reference_morning();
        morning.hrv.baseline = None;
        morning.resting_heart_rate.current_value = None;

        let insight = generate_recovery_insight(&morning).unwrap();
        assert_eq!(names(&insight), vec![SLEEP_QUALITY]);
        // Only one component: driver and limiter coincide
        assert_eq!(insight.headline, MIXED_SIGNALS_HEADLINE);
    }

    #[test]
    fn test_stable_headline() {
        let mut morning = reference_morning();
        morning.sleep = RecoveryComponentScore::score_only(88.0);

        let insight = generate_recovery_insight(&morning).unwrap();
        assert_eq!(insight.headline, STABLE_HEADLINE);
        assert_eq!(
            insight.component(SLEEP_QUALITY).unwrap().analysis,
            "Excellent sleep gave your body a strong foundation for recovery."
        );
    }

    #[test]
    fn test_mixed_signals_when_all_equal() {
        let mut morning = reference_morning();
        morning.hrv.score = 70.0;
        morning.resting_heart_rate.score = 66.0;
        morning.sleep = RecoveryComponentScore::score_only(75.0);

        let insight = generate_recovery_insight(&morning).unwrap();
        assert!(insight
            .component_breakdown
            .iter()
            .all(|c| c.status == QualitativeStatus::Fair));
        assert_eq!(insight.headline, MIXED_SIGNALS_HEADLINE);
    }

    #[test]
    fn test_negative_deltas() {
        let mut morning = reference_morning();
        morning.hrv = RecoveryComponentScore::new(Some(50.0), Some(62.5), 55.0);
        morning.resting_heart_rate = RecoveryComponentScore::new(Some(66.0), Some(60.0), 70.0);
        morning.sleep = RecoveryComponentScore::score_only(92.0);

        let insight = generate_recovery_insight(&morning).unwrap();
        let hrv = insight.component(HEART_RATE_VARIABILITY).unwrap();
        assert!(hrv.analysis.starts_with("Your HRV is 20% below your baseline"));
        assert_eq!(hrv.status, QualitativeStatus::Poor);

        let rhr = insight.component(RESTING_HEART_RATE).unwrap();
        assert!(rhr.analysis.starts_with("Your resting heart rate is 10% above your baseline"));

        assert_eq!(insight.headline, LIMITER_HEADLINES.lookup(HEART_RATE_VARIABILITY));
    }

    #[test]
    fn test_sleep_analysis_thresholds() {
        let cases = [
            (85.0, "Excellent sleep gave your body a strong foundation for recovery."),
            (84.9, "Good sleep supported your recovery overnight."),
            (70.0, "Good sleep supported your recovery overnight."),
            (69.9, "Fair sleep may have limited how much you recovered."),
            (50.0, "Fair sleep may have limited how much you recovered."),
            (49.9, "Poor sleep is significantly hindering your recovery."),
        ];

        for (score, expected) in cases {
            let c = RecoveryInsightEngine::sleep_component(&RecoveryComponentScore::score_only(score));
            assert_eq!(c.analysis, expected, "score {}", score);
        }

        // 85 reads as excellent but classifies Good under the score cut points
        let c = RecoveryInsightEngine::sleep_component(&RecoveryComponentScore::score_only(85.0));
        assert_eq!(c.status, QualitativeStatus::Good);
    }

    #[test]
    fn test_recommendation_bands() {
        assert_eq!(RecoveryBand::from_score(100.0), RecoveryBand::Peak);
        assert_eq!(RecoveryBand::from_score(85.0), RecoveryBand::Peak);
        assert_eq!(RecoveryBand::from_score(84.9), RecoveryBand::Ready);
        assert_eq!(RecoveryBand::from_score(65.0), RecoveryBand::Ready);
        assert_eq!(RecoveryBand::from_score(64.9), RecoveryBand::Moderate);
        assert_eq!(RecoveryBand::from_score(40.0), RecoveryBand::Moderate);
        assert_eq!(RecoveryBand::from_score(39.9), RecoveryBand::Rest);
        assert_eq!(RecoveryBand::from_score(0.0), RecoveryBand::Rest);
    }

    #[test]
    fn test_recommendation_follows_final_score() {
        let mut morning = reference_morning();
        morning.final_score = 30.0;
        let insight = generate_recovery_insight(&morning).unwrap();
        assert_eq!(insight.recommendation, RecoveryBand::Rest.recommendation());

        morning.final_score = 90.0;
        let insight = generate_recovery_insight(&morning).unwrap();
        assert_eq!(insight.recommendation, RecoveryBand::Peak.recommendation());
    }

    #[test]
    fn test_limiter_table_keeps_stress_entry() {
        assert_ne!(
            LIMITER_HEADLINES.lookup(PHYSIOLOGICAL_STRESS),
            LIMITER_HEADLINES.default_phrase()
        );
        assert_eq!(
            LIMITER_HEADLINES.lookup("Skin Temperature"),
            "Your recovery is below its usual level today."
        );
    }

    #[test]
    fn test_zero_baseline_is_rejected() {
        let mut morning = reference_morning();
        morning.hrv.baseline = Some(0.0);
        assert!(matches!(
            generate_recovery_insight(&morning),
            Err(RestRsError::Validation(ValidationError::ZeroBaseline { .. }))
        ));
    }

    proptest! {
        #[test]
        fn test_recovery_insight_is_idempotent(
            hrv_score in 0.0f64..=100.0,
            rhr_score in 0.0f64..=100.0,
            sleep_score in 0.0f64..=100.0,
            final_score in 0.0f64..=100.0,
        ) {
            let mut morning = reference_morning();
            morning.hrv.score = hrv_score;
            morning.resting_heart_rate.score = rhr_score;
            morning.sleep = RecoveryComponentScore::score_only(sleep_score);
            morning.final_score = final_score;

            let first = generate_recovery_insight(&morning).unwrap();
            let second = generate_recovery_insight(&morning).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(
                names(&first),
                vec![HEART_RATE_VARIABILITY, RESTING_HEART_RATE, SLEEP_QUALITY]
            );
        }
    }
}

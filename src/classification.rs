//! Qualitative classifiers
//!
//! Two distinct classifiers map a number onto a [`QualitativeStatus`]:
//!
//! - **Band classifier** ([`classify_in_range`]): range-relative. A value inside
//!   a closed interval is Optimal; outside it, the fractional deviation from the
//!   nearest bound picks the bucket.
//! - **Score classifier** ([`classify_score`]): absolute. A 0-100 score is
//!   looked up against fixed cut points.
//!
//! The two are deliberately kept apart and must not be unified.

use crate::error::ValidationError;
use crate::status::QualitativeStatus;
use serde::{Deserialize, Serialize};

/// Deviation below which an out-of-band value is still Good
pub const GOOD_DEVIATION: f64 = 0.05;

/// Deviation below which an out-of-band value is Fair
pub const FAIR_DEVIATION: f64 = 0.15;

/// Minimum score for Optimal
pub const OPTIMAL_SCORE: f64 = 90.0;

/// Minimum score for Good
pub const GOOD_SCORE: f64 = 80.0;

/// Minimum score for Fair
pub const FAIR_SCORE: f64 = 65.0;

/// Closed interval `[lower, upper]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosedRange {
    pub lower: f64,
    pub upper: f64,
}

impl ClosedRange {
    /// Create a validated range
    ///
    /// Both bounds must be finite and `lower <= upper`.
    pub fn new(lower: f64, upper: f64) -> Result<Self, ValidationError> {
        let lower = ValidationError::ensure_finite("range.lower", lower)?;
        let upper = ValidationError::ensure_finite("range.upper", upper)?;

        if lower > upper {
            return Err(ValidationError::InvalidRange { lower, upper });
        }

        Ok(Self { lower, upper })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Fractional deviation of `value` from the nearest bound
    ///
    /// Zero inside the range. Infinite when the value is below a zero
    /// lower bound, which lands it in the Poor bucket.
    pub fn deviation(&self, value: f64) -> f64 {
        if self.contains(value) {
            0.0
        } else if value < self.lower {
            if self.lower == 0.0 {
                return f64::INFINITY;
            }
            (self.lower - value) / self.lower
        } else {
            if self.upper == 0.0 {
                return f64::INFINITY;
            }
            (value - self.upper) / self.upper
        }
    }
}

/// Classify a value against a band by percentage deviation
///
/// - Inside `[lower, upper]` (inclusive): Optimal
/// - Deviation < 5%: Good
/// - 5% <= deviation < 15%: Fair
/// - Otherwise: Poor
pub fn classify_in_range(value: f64, range: &ClosedRange) -> QualitativeStatus {
    if range.contains(value) {
        return QualitativeStatus::Optimal;
    }

    let deviation = range.deviation(value);

    if deviation < GOOD_DEVIATION {
        QualitativeStatus::Good
    } else if deviation < FAIR_DEVIATION {
        QualitativeStatus::Fair
    } else {
        QualitativeStatus::Poor
    }
}

/// Classify a 0-100 score against fixed cut points
///
/// - >= 90: Optimal
/// - 80-90: Good
/// - 65-80: Fair
/// - < 65: Poor
pub fn classify_score(score: f64) -> QualitativeStatus {
    match score {
        s if s >= OPTIMAL_SCORE => QualitativeStatus::Optimal,
        s if s >= GOOD_SCORE => QualitativeStatus::Good,
        s if s >= FAIR_SCORE => QualitativeStatus::Fair,
        _ => QualitativeStatus::Poor,
    }
}

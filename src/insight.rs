//! Insight output model
//!
//! An [`Insight`] is the three-layer result both engines produce: a headline,
//! a per-component breakdown, and a recommendation. It is built once per
//! engine call and never mutated afterwards.

use crate::status::{least_severe, most_severe, QualitativeStatus};
use serde::{Deserialize, Serialize};

/// One row of the breakdown, describing a single metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInsight {
    /// Stable metric identifier, also used for display and phrase lookups
    pub metric_name: String,

    /// Pre-formatted measured value (e.g. "7h 30m", "93%", "58 bpm")
    pub user_value: String,

    /// Pre-formatted reference description
    pub optimal_range: String,

    /// One generated sentence about this metric
    pub analysis: String,

    /// Qualitative bucket
    pub status: QualitativeStatus,
}

impl ComponentInsight {
    pub fn new(
        metric_name: impl Into<String>,
        user_value: impl Into<String>,
        optimal_range: impl Into<String>,
        analysis: impl Into<String>,
        status: QualitativeStatus,
    ) -> Self {
        Self {
            metric_name: metric_name.into(),
            user_value: user_value.into(),
            optimal_range: optimal_range.into(),
            analysis: analysis.into(),
            status,
        }
    }

    /// Stable list key for presentation layers
    ///
    /// Derived from the metric name, so repeated runs yield the same key.
    pub fn id(&self) -> String {
        self.metric_name.to_lowercase().replace(' ', "-")
    }
}

/// Three-layer insight: headline, breakdown, recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub headline: String,

    /// Components in fixed evaluation order, not severity order
    pub component_breakdown: Vec<ComponentInsight>,

    pub recommendation: String,
}

/// Insight produced from a sleep score result
pub type SleepInsight = Insight;

/// Insight produced from a recovery score result
pub type RecoveryInsight = Insight;

impl Insight {
    /// Worst component (first one on ties)
    pub fn weakest(&self) -> Option<&ComponentInsight> {
        most_severe(&self.component_breakdown, |c| c.status)
    }

    /// Best component (first one on ties)
    pub fn strongest(&self) -> Option<&ComponentInsight> {
        least_severe(&self.component_breakdown, |c| c.status)
    }

    /// Status of the weakest component
    pub fn overall_status(&self) -> Option<QualitativeStatus> {
        self.weakest().map(|c| c.status)
    }

    pub fn component(&self, metric_name: &str) -> Option<&ComponentInsight> {
        self.component_breakdown
            .iter()
            .find(|c| c.metric_name == metric_name)
    }
}

/// Fixed mapping from metric identifier to a canned sentence
///
/// Every table carries a default, so a lookup always yields a sentence.
#[derive(Debug, Clone, Copy)]
pub struct PhraseTable {
    entries: &'static [(&'static str, &'static str)],
    default: &'static str,
}

impl PhraseTable {
    pub const fn new(
        entries: &'static [(&'static str, &'static str)],
        default: &'static str,
    ) -> Self {
        Self { entries, default }
    }

    pub fn lookup(&self, key: &str) -> &'static str {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, phrase)| *phrase)
            .unwrap_or(self.default)
    }

    pub fn default_phrase(&self) -> &'static str {
        self.default
    }
}

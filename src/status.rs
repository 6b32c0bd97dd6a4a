//! Qualitative status buckets and severity ranking
//!
//! Every classified metric lands in one of four buckets. The buckets are
//! totally ordered by "goodness": Optimal > Good > Fair > Poor. Extremum
//! selection (weakest/strongest component, primary driver/limiter) goes
//! through [`QualitativeStatus::severity`] so that every caller ranks the
//! buckets the same way.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualitative classification of a single metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualitativeStatus {
    /// Inside the optimal band
    Optimal,
    /// Just outside the band (< 5% deviation)
    Good,
    /// Moderately outside the band (5-15% deviation)
    Fair,
    /// Well outside the band (>= 15% deviation)
    Poor,
}

impl QualitativeStatus {
    /// All statuses from best to worst
    pub const ALL: [QualitativeStatus; 4] = [
        QualitativeStatus::Optimal,
        QualitativeStatus::Good,
        QualitativeStatus::Fair,
        QualitativeStatus::Poor,
    ];

    /// Severity ordinal: 0 for Optimal up to 3 for Poor
    pub fn severity(&self) -> u8 {
        match self {
            QualitativeStatus::Optimal => 0,
            QualitativeStatus::Good => 1,
            QualitativeStatus::Fair => 2,
            QualitativeStatus::Poor => 3,
        }
    }

    /// Optimal or Good
    pub fn is_favorable(&self) -> bool {
        self.severity() <= QualitativeStatus::Good.severity()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualitativeStatus::Optimal => "Optimal",
            QualitativeStatus::Good => "Good",
            QualitativeStatus::Fair => "Fair",
            QualitativeStatus::Poor => "Poor",
        }
    }
}

impl fmt::Display for QualitativeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pick the item with the highest severity. Ties go to the earliest item.
pub fn most_severe<T, F>(items: &[T], status_of: F) -> Option<&T>
where
    F: Fn(&T) -> QualitativeStatus,
{
    items.iter().fold(None, |worst: Option<&T>, item| match worst {
        Some(current) if status_of(current).severity() >= status_of(item).severity() => {
            Some(current)
        }
        _ => Some(item),
    })
}

/// Pick the item with the lowest severity. Ties go to the earliest item.
pub fn least_severe<T, F>(items: &[T], status_of: F) -> Option<&T>
where
    F: Fn(&T) -> QualitativeStatus,
{
    items.iter().fold(None, |best: Option<&T>, item| match best {
        Some(current) if status_of(current).severity() <= status_of(item).severity() => {
            Some(current)
        }
        _ => Some(item),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        let severities: Vec<u8> = QualitativeStatus::ALL.iter().map(|s| s.severity()).collect();
        assert_eq!(severities, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", QualitativeStatus::Optimal), "Optimal");
        assert_eq!(format!("{}", QualitativeStatus::Poor), "Poor");
    }

    #[test]
    fn test_favorable() {
        assert!(QualitativeStatus::Optimal.is_favorable());
        assert!(QualitativeStatus::Good.is_favorable());
        assert!(!QualitativeStatus::Fair.is_favorable());
        assert!(!QualitativeStatus::Poor.is_favorable());
    }

    #[test]
    fn test_extremes_pick_first_on_tie() {
        let items = vec![
            ("a", QualitativeStatus::Fair),
            ("b", QualitativeStatus::Optimal),
            ("c", QualitativeStatus::Fair),
            ("d", QualitativeStatus::Optimal),
        ];

        let worst = most_severe(&items, |i| i.1).unwrap();
        assert_eq!(worst.0, "a");

        let best = least_severe(&items, |i| i.1).unwrap();
        assert_eq!(best.0, "b");
    }

    #[test]
    fn test_extremes_empty() {
        let items: Vec<QualitativeStatus> = Vec::new();
        assert!(most_severe(&items, |s| *s).is_none());
        assert!(least_severe(&items, |s| *s).is_none());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&QualitativeStatus::Good).unwrap();
        assert_eq!(json, "\"good\"");
        let back: QualitativeStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, QualitativeStatus::Good);
    }
}

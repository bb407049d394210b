//! Fire-once threshold tracking

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// What a threshold measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKind {
    /// Scroll depth, in percent of the scrollable distance
    Scroll,
    /// Time on page, in seconds
    Time,
}

impl fmt::Display for ThresholdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scroll => write!(f, "scroll"),
            Self::Time => write!(f, "time"),
        }
    }
}

/// One engagement threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EngagementThreshold {
    pub kind: ThresholdKind,
    pub value: u32,
}

/// Ascending threshold set that reports each threshold at most once.
///
/// Fired state lives as long as the tracker, which is one page lifetime.
#[derive(Debug, Clone)]
pub struct ThresholdTracker {
    kind: ThresholdKind,
    thresholds: Vec<u32>,
    fired: BTreeSet<u32>,
}

impl ThresholdTracker {
    /// Create a tracker; thresholds are sorted and deduplicated.
    pub fn new(kind: ThresholdKind, thresholds: impl IntoIterator<Item = u32>) -> Self {
        let mut thresholds: Vec<u32> = thresholds.into_iter().collect();
        thresholds.sort_unstable();
        thresholds.dedup();
        Self {
            kind,
            thresholds,
            fired: BTreeSet::new(),
        }
    }

    pub fn kind(&self) -> ThresholdKind {
        self.kind
    }

    pub fn thresholds(&self) -> impl Iterator<Item = EngagementThreshold> + '_ {
        self.thresholds.iter().map(|&value| EngagementThreshold {
            kind: self.kind,
            value,
        })
    }

    /// Mark and return, in ascending order, every unfired threshold the
    /// metric has reached.
    pub fn crossed(&mut self, metric: i64) -> Vec<u32> {
        let mut newly = Vec::new();
        for &threshold in &self.thresholds {
            if metric < i64::from(threshold) {
                break;
            }
            if self.fired.insert(threshold) {
                newly.push(threshold);
            }
        }
        newly
    }

    pub fn is_fired(&self, threshold: u32) -> bool {
        self.fired.contains(&threshold)
    }

    /// Whether every threshold has fired.
    pub fn is_exhausted(&self) -> bool {
        self.fired.len() == self.thresholds.len()
    }
}

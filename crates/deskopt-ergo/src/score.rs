//! Scan-level ergonomic score.
//!
//! Each regulated item contributes `weight(priority) * severity`; the scan's
//! ceiling is what every regulated item would cost at maximum severity. The
//! score is `100 - min(100, 100 * total / ceiling)`, normalized by the number
//! and priority of the items that were scored.

use crate::evaluate::{Classification, ItemRef, Verdict};
use deskopt_core::{EngineConfig, PriorityLevel, Real, ScoringConfig};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One penalized item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub item: ItemRef,
    pub priority: PriorityLevel,
    pub classifications: Vec<Classification>,
    pub distance_deviation_cm: Real,
    pub angle_deviation_deg: Real,
    pub severity: Real,
    pub penalty: Real,
    /// Unsaturated violation size; orders issues of equal priority.
    pub deviation: Real,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErgonomicScore {
    /// `0..=100` at full precision; banding is left to the presentation layer.
    pub value: Real,
    pub total_penalty: Real,
    pub max_penalty: Real,
    /// Number of regulated verdicts that entered the score.
    pub scored_items: usize,
    /// Penalized items, most urgent first.
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScoreOutcome {
    Scored(ErgonomicScore),
    /// Nothing regulated was detected, so there is nothing to score.
    InsufficientData {
        detected_items: usize,
        unregulated_items: usize,
    },
}

impl ScoreOutcome {
    pub fn value(&self) -> Option<Real> {
        match self {
            ScoreOutcome::Scored(s) => Some(s.value),
            ScoreOutcome::InsufficientData { .. } => None,
        }
    }

    pub fn score(&self) -> Option<&ErgonomicScore> {
        match self {
            ScoreOutcome::Scored(s) => Some(s),
            ScoreOutcome::InsufficientData { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    scoring: ScoringConfig,
    max_severity: Real,
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ScoreAggregator {
    pub fn new(scoring: ScoringConfig, max_severity: Real) -> Self {
        Self {
            scoring,
            max_severity,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.scoring.clone(), config.evaluation.max_severity)
    }

    pub fn weight(&self, priority: PriorityLevel) -> Real {
        self.scoring.priority_weights[priority.index()]
    }

    pub fn aggregate(&self, verdicts: &[Verdict]) -> ScoreOutcome {
        let mut max_penalty = 0.0;
        let mut total_penalty = 0.0;
        let mut scored_items = 0;
        let mut issues = Vec::new();

        for v in verdicts {
            let Some(check) = v.check() else {
                continue;
            };
            scored_items += 1;
            let weight = self.weight(check.priority());
            max_penalty += weight * self.max_severity;
            if check.is_ok() {
                continue;
            }
            let penalty = weight * check.severity;
            total_penalty += penalty;
            issues.push(Issue {
                item: v.item.clone(),
                priority: check.priority(),
                classifications: check.classifications(),
                distance_deviation_cm: check.distance.deviation_cm,
                angle_deviation_deg: check.angle.deviation_deg,
                severity: check.severity,
                penalty,
                deviation: check.deviation_magnitude(),
            });
        }

        if scored_items == 0 {
            return ScoreOutcome::InsufficientData {
                detected_items: verdicts.len(),
                unregulated_items: verdicts.len(),
            };
        }

        issues.sort_by(issue_order);

        let value = if max_penalty > 0.0 {
            100.0 - (100.0 * total_penalty / max_penalty).min(100.0)
        } else {
            100.0
        };

        ScoreOutcome::Scored(ErgonomicScore {
            value,
            total_penalty,
            max_penalty,
            scored_items,
            issues,
        })
    }
}

fn issue_order(a: &Issue, b: &Issue) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| b.deviation.total_cmp(&a.deviation))
        .then_with(|| a.item.index.cmp(&b.item.index))
}

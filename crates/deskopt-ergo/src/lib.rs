//! Ergonomic policy for `deskopt`.
//!
//! Given desk-frame positions from `deskopt-linear`, this crate decides what
//! is wrong with a desk and how to fix it:
//!
//! - [`RuleBook`] / [`RuleMatcher`]: exact `(role, item)` rule lookup with a
//!   deterministic tie-break and handedness mirroring.
//! - [`PlacementEvaluator`]: per-item [`Verdict`]s (OK, too close, too far,
//!   mis-angled, unregulated) with signed deviations and a severity.
//! - [`ScoreAggregator`]: a priority-weighted 0-100 score, or
//!   [`ScoreOutcome::InsufficientData`] when nothing regulated was seen.
//! - [`RecommendationGenerator`]: target positions, rotations and
//!   instructions, most urgent first.

mod evaluate;
mod recommend;
mod rules;
mod score;

pub use evaluate::*;
pub use recommend::*;
pub use rules::*;
pub use score::*;

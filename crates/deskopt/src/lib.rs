//! High-level entry crate for the `deskopt` desk ergonomics engine.
//!
//! Turns one desk photo's clicks and detections into a scored, ordered list
//! of corrective moves for a specific user:
//!
//! `card clicks -> calibration -> desk frame -> rules -> verdicts -> score + recommendations`
//!
//! # Quick Start
//!
//! ```
//! use deskopt::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request: ScanRequest = serde_json::from_str(r#"{
//!     "profile": {"role": "coder"},
//!     "calibration_points": [[500, 700], [585, 700], [585, 754], [500, 754]],
//!     "desk_boundary": [[100, 300], [1300, 300], [1300, 900], [100, 900]],
//!     "detections": [{"item_slug": "keyboard", "x_px": 700, "y_px": 450, "rotation": 20}]
//! }"#)?;
//!
//! let report = run_analysis(&request, &RuleBook::builtin(), &EngineConfig::default())?;
//! assert_eq!(report.recommendations[0].target_distance_cm, Some(30.0));
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`session`] - [`ScanSession`] and the end-to-end [`run_analysis`]
//! - [`ergo`] - rule book, evaluator, score aggregator, recommendations
//! - [`core`] - math aliases, domain types, configuration
//! - [`linear`] - calibration and desk coordinate mapping
//! - [`synthetic`] - deterministic synthetic desks for tests and demos

// ═══════════════════════════════════════════════════════════════════════════════
// Scan Workflow
// ═══════════════════════════════════════════════════════════════════════════════

/// One calibrated photo and its analysis.
pub mod session {
    pub use deskopt_pipeline::{
        AnalysisError, AnalysisReport, CalibrationSummary, RejectedDetection, RejectionReason,
        ScanRequest, ScanSession, run_analysis,
    };
}

/// Ergonomic policy: rules, verdicts, score and recommendations.
pub mod ergo {
    pub use deskopt_ergo::*;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Foundation Crates
// ═══════════════════════════════════════════════════════════════════════════════

/// Math aliases, domain records and engine configuration.
///
/// Re-exports everything from `deskopt_core`.
pub mod core {
    pub use deskopt_core::*;
}

/// Closed-form calibration and desk coordinate mapping.
///
/// Re-exports everything from `deskopt_linear`.
pub mod linear {
    pub use deskopt_linear::*;
}

/// Deterministic synthetic desk photos for testing.
pub mod synthetic {
    pub use deskopt_core::synthetic::*;
}

// ═══════════════════════════════════════════════════════════════════════════════
// Convenience Re-exports (Top-Level)
// ═══════════════════════════════════════════════════════════════════════════════

pub use deskopt_pipeline::{AnalysisError, AnalysisReport, ScanRequest, ScanSession, run_analysis};

pub use deskopt_ergo::{
    Classification, Recommendation, RuleBook, RuleMatcher, ScoreOutcome, Verdict,
};

pub use deskopt_linear::{Calibration, CalibrationError, CoordinateMapper, DeskBoundary};

pub use deskopt_core::{
    DetectedItem, EngineConfig, ErgonomicRule, Handedness, ItemCategory, PriorityLevel, Profile,
    ProfileRef, Pt2, Role,
};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude (Quick Start)
// ═══════════════════════════════════════════════════════════════════════════════

/// Convenient re-exports for common use cases.
///
/// ```
/// use deskopt::prelude::*;
/// let book = RuleBook::builtin();
/// assert!(!book.is_empty());
/// ```
pub mod prelude {
    pub use crate::{AnalysisReport, ScanRequest, ScanSession, run_analysis};

    pub use crate::{Classification, Recommendation, RuleBook, ScoreOutcome, Verdict};

    pub use crate::{
        DetectedItem, EngineConfig, Handedness, Profile, ProfileRef, Pt2, Role,
    };
}

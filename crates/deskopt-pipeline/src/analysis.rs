//! End-to-end analysis of one desk photo.

use crate::session::ScanSession;
use deskopt_core::{ConfigError, DetectedItem, EngineConfig, ProfileRef, Pt2, Real};
use deskopt_ergo::{Recommendation, RuleAmbiguity, RuleBook, ScoreOutcome, Verdict};
use deskopt_linear::{Calibration, CalibrationError, CardOrientation, DeskDimensions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("reference card calibration failed: {0}")]
    Calibration(#[from] CalibrationError),
    #[error("desk boundary rejected: {0}")]
    DeskBoundary(#[source] CalibrationError),
}

/// Everything the GUI hands over when the user asks for an analysis.
///
/// Points are `[x, y]` pixel pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRequest {
    pub profile: ProfileRef,
    pub calibration_points: Vec<Pt2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desk_boundary: Option<Vec<Pt2>>,
    #[serde(default)]
    pub detections: Vec<DetectedItem>,
}

/// Calibration figures worth showing next to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSummary {
    pub cm_per_px: Real,
    pub px_per_cm: Real,
    pub aspect_ratio: Real,
    pub orientation: CardOrientation,
    /// True when a homography was needed (card seen at an angle).
    pub projective: bool,
    /// Card corners `[TL, TR, BR, BL]` in pixels.
    pub corners_px: [Pt2; 4],
}

impl From<&Calibration> for CalibrationSummary {
    fn from(c: &Calibration) -> Self {
        Self {
            cm_per_px: c.cm_per_px,
            px_per_cm: c.px_per_cm(),
            aspect_ratio: c.aspect_ratio,
            orientation: c.orientation,
            projective: c.transform.is_projective(),
            corners_px: *c.quad.corners(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    /// `is_correct` was not set during triage.
    Unconfirmed,
    NonFiniteGeometry,
    /// The pixel lies on the horizon of the desk plane.
    Unmappable,
}

/// A detection that never reached evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedDetection {
    pub index: usize,
    pub item_slug: String,
    pub reason: RejectionReason,
}

/// Result of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub profile: ProfileRef,
    pub calibration: CalibrationSummary,
    /// False when distances are measured from the card rather than the desk edge.
    pub boundary_known: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desk_dimensions: Option<DeskDimensions>,
    pub verdicts: Vec<Verdict>,
    pub score: ScoreOutcome,
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub ambiguities: Vec<RuleAmbiguity>,
    #[serde(default)]
    pub rejected: Vec<RejectedDetection>,
}

/// Calibrate, apply the optional desk boundary and analyze in one call.
pub fn run_analysis(
    request: &ScanRequest,
    book: &RuleBook,
    config: &EngineConfig,
) -> Result<AnalysisReport, AnalysisError> {
    let mut session = ScanSession::calibrate(&request.calibration_points, config)?;
    if let Some(desk) = &request.desk_boundary {
        session = session
            .with_desk_boundary(desk)
            .map_err(AnalysisError::DeskBoundary)?;
    }
    Ok(session.analyze(&request.profile, &request.detections, book))
}

//! Reference-card calibration.
//!
//! Four clicked corners of a card of known size give the pixel-to-centimeter
//! mapping of the desk plane. When the card appears axis-aligned the mapping
//! is a pure scale (`cm_per_px`); otherwise a homography is solved from the
//! four corners onto the ideal `width x height` rectangle.

use crate::homography::{HomographyError, dlt_homography};
use crate::quad::Quad;
use deskopt_core::{CalibrationConfig, Mat3, Pt2, Real, apply_homography};
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that make a scan's calibration unusable.
///
/// All variants ask the user to re-click the reference corners.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("expected exactly 4 corner points, got {0}")]
    PointCount(usize),
    #[error("degenerate geometry: {detail}")]
    DegenerateGeometry { detail: String },
    #[error(
        "aspect mismatch: measured {measured:.3}, expected {expected:.3} (tolerance {tolerance:.2})"
    )]
    AspectMismatch {
        measured: Real,
        expected: Real,
        tolerance: Real,
    },
    #[error("invalid reference object size {width_cm} x {height_cm} cm")]
    InvalidReference { width_cm: Real, height_cm: Real },
    #[error("perspective solve failed: {0}")]
    SolveFailed(#[from] HomographyError),
}

impl CalibrationError {
    pub(crate) fn degenerate(detail: impl Into<String>) -> Self {
        CalibrationError::DegenerateGeometry {
            detail: detail.into(),
        }
    }
}

/// Which image direction the card's long edge runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardOrientation {
    /// Long edge along the top/bottom of the quad.
    Landscape,
    /// Long edge along the left/right of the quad.
    Portrait,
}

/// Pixel -> card-plane centimeter mapping of one scan.
///
/// The card plane has its origin at the card's top-left corner, `x` along
/// the top edge and `y` along the left edge, like the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanTransform {
    Scale { cm_per_px: Real, origin_px: Pt2 },
    Homography { px_to_cm: Mat3 },
}

impl ScanTransform {
    /// Map a pixel into card-plane centimeters.
    ///
    /// `None` only for a homography and a pixel on its vanishing line.
    pub fn map_point(&self, px: &Pt2) -> Option<Pt2> {
        match self {
            ScanTransform::Scale {
                cm_per_px,
                origin_px,
            } => Some(Pt2::from((px - origin_px) * *cm_per_px)),
            ScanTransform::Homography { px_to_cm } => apply_homography(px_to_cm, px),
        }
    }

    pub fn is_projective(&self) -> bool {
        matches!(self, ScanTransform::Homography { .. })
    }
}

/// Result of a successful calibration. Immutable for the scan's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Card corners `[TL, TR, BR, BL]` in pixels.
    pub quad: Quad,
    /// Reference long edge divided by the mean measured long edge.
    pub cm_per_px: Real,
    pub long_edge_px: Real,
    pub short_edge_px: Real,
    /// Measured long/short ratio.
    pub aspect_ratio: Real,
    pub orientation: CardOrientation,
    pub transform: ScanTransform,
}

impl Calibration {
    pub fn px_per_cm(&self) -> Real {
        1.0 / self.cm_per_px
    }

    pub fn map_point(&self, px: &Pt2) -> Option<Pt2> {
        self.transform.map_point(px)
    }
}

/// Solves a [`Calibration`] from four clicked card corners.
#[derive(Debug, Clone, Default)]
pub struct CalibrationSolver {
    config: CalibrationConfig,
}

impl CalibrationSolver {
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Calibrate from four corner clicks in any order.
    ///
    /// Validation order: reference size, point count, geometry (duplicates,
    /// edge range, collinearity, convexity), aspect ratio.
    pub fn solve(&self, clicks: &[Pt2]) -> Result<Calibration, CalibrationError> {
        let cfg = &self.config;
        let (w, h) = (cfg.reference_width_cm, cfg.reference_height_cm);
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err(CalibrationError::InvalidReference {
                width_cm: w,
                height_cm: h,
            });
        }
        let long_cm = w.max(h);
        let short_cm = w.min(h);

        let quad = Quad::from_clicks(clicks, cfg)?;

        let horizontal = quad.mean_horizontal_px();
        let vertical = quad.mean_vertical_px();
        let (orientation, long_edge_px, short_edge_px) = if horizontal >= vertical {
            (CardOrientation::Landscape, horizontal, vertical)
        } else {
            (CardOrientation::Portrait, vertical, horizontal)
        };

        let aspect_ratio = long_edge_px / short_edge_px;
        let expected = cfg.expected_aspect();
        if (aspect_ratio / expected - 1.0).abs() > cfg.aspect_tolerance {
            return Err(CalibrationError::AspectMismatch {
                measured: aspect_ratio,
                expected,
                tolerance: cfg.aspect_tolerance,
            });
        }

        let cm_per_px = long_cm / long_edge_px;

        let transform = if quad.is_axis_aligned(cfg.axis_tolerance_deg) {
            ScanTransform::Scale {
                cm_per_px,
                origin_px: quad.corners()[0],
            }
        } else {
            let (rect_w, rect_h) = match orientation {
                CardOrientation::Landscape => (long_cm, short_cm),
                CardOrientation::Portrait => (short_cm, long_cm),
            };
            let ideal = [
                Pt2::new(0.0, 0.0),
                Pt2::new(rect_w, 0.0),
                Pt2::new(rect_w, rect_h),
                Pt2::new(0.0, rect_h),
            ];
            let px_to_cm = dlt_homography(quad.corners(), &ideal)?;
            ScanTransform::Homography { px_to_cm }
        };

        debug!(
            "calibrated: {:?} card, {:.4} cm/px, aspect {:.3}, projective={}",
            orientation,
            cm_per_px,
            aspect_ratio,
            transform.is_projective()
        );

        Ok(Calibration {
            quad,
            cm_per_px,
            long_edge_px,
            short_edge_px,
            aspect_ratio,
            orientation,
            transform,
        })
    }
}

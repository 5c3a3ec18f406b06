//! Four-click quadrilaterals.
//!
//! Users click corners in whatever order they like. A [`Quad`] stores them
//! clockwise (image coordinates, y down) starting at the top-left corner and
//! guarantees the shape is a proper convex quadrilateral.

use crate::CalibrationError;
use deskopt_core::{CalibrationConfig, Pt2, Real, ReferenceCorner, polygon_signed_area, turn};
use serde::{Deserialize, Serialize};

/// Interior angles sharper than this (as `sin`) count as collinear corners.
const MIN_CORNER_SIN: Real = 1e-3;

/// Convex quadrilateral, corners `[TL, TR, BR, BL]` in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quad {
    corners: [Pt2; 4],
}

impl Quad {
    /// Order and validate four clicked corners.
    ///
    /// Fails with [`CalibrationError::DegenerateGeometry`] for duplicate,
    /// collinear or non-convex clicks and for edges outside the configured
    /// pixel range.
    pub fn from_clicks(points: &[Pt2], config: &CalibrationConfig) -> Result<Self, CalibrationError> {
        let clicks: [Pt2; 4] = points
            .try_into()
            .map_err(|_| CalibrationError::PointCount(points.len()))?;

        if clicks.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(CalibrationError::degenerate("corner coordinates must be finite"));
        }

        for i in 0..4 {
            for j in (i + 1)..4 {
                let d = (clicks[i] - clicks[j]).norm();
                if d < config.min_edge_px {
                    return Err(CalibrationError::degenerate(format!(
                        "corners {i} and {j} are {d:.1} px apart (minimum {:.1} px)",
                        config.min_edge_px
                    )));
                }
            }
        }

        let quad = Self {
            corners: order_clockwise(clicks),
        };

        for (k, len) in quad.edge_lengths().iter().enumerate() {
            if *len > config.max_edge_px {
                return Err(CalibrationError::degenerate(format!(
                    "edge {k} is {len:.1} px long (maximum {:.1} px)",
                    config.max_edge_px
                )));
            }
        }

        let c = &quad.corners;
        for i in 0..4 {
            let a = &c[(i + 3) % 4];
            let b = &c[i];
            let n = &c[(i + 1) % 4];
            let sin = turn(a, b, n) / ((b - a).norm() * (n - b).norm());
            if sin.abs() < MIN_CORNER_SIN {
                return Err(CalibrationError::degenerate(
                    "three corners are collinear",
                ));
            }
            if sin < 0.0 {
                return Err(CalibrationError::degenerate("quadrilateral is not convex"));
            }
        }

        Ok(quad)
    }

    pub fn corners(&self) -> &[Pt2; 4] {
        &self.corners
    }

    pub fn corner(&self, which: ReferenceCorner) -> Pt2 {
        self.corners[which.index()]
    }

    /// Edge lengths `[top, right, bottom, left]` in pixels.
    pub fn edge_lengths(&self) -> [Real; 4] {
        let c = &self.corners;
        [
            (c[1] - c[0]).norm(),
            (c[2] - c[1]).norm(),
            (c[3] - c[2]).norm(),
            (c[0] - c[3]).norm(),
        ]
    }

    /// Mean of the top and bottom edges.
    pub fn mean_horizontal_px(&self) -> Real {
        let [top, _, bottom, _] = self.edge_lengths();
        0.5 * (top + bottom)
    }

    /// Mean of the left and right edges.
    pub fn mean_vertical_px(&self) -> Real {
        let [_, right, _, left] = self.edge_lengths();
        0.5 * (left + right)
    }

    pub fn area_px(&self) -> Real {
        polygon_signed_area(&self.corners).abs()
    }

    /// True when every edge is within `tolerance_deg` of an image axis.
    pub fn is_axis_aligned(&self, tolerance_deg: Real) -> bool {
        let c = &self.corners;
        (0..4).all(|i| {
            let e = c[(i + 1) % 4] - c[i];
            let a = e.y.abs().atan2(e.x.abs()).to_degrees();
            a.min(90.0 - a) <= tolerance_deg
        })
    }
}

/// Sort four points clockwise around their centroid (image coordinates) and
/// rotate the order so it starts at the top-left corner.
///
/// The top-left corner is the one with the smallest `x + y`; ties go to the
/// smaller `y`.
pub fn order_clockwise(points: [Pt2; 4]) -> [Pt2; 4] {
    let cx = points.iter().map(|p| p.x).sum::<Real>() / 4.0;
    let cy = points.iter().map(|p| p.y).sum::<Real>() / 4.0;

    let mut sorted = points;
    sorted.sort_by(|a, b| {
        let ta = (a.y - cy).atan2(a.x - cx);
        let tb = (b.y - cy).atan2(b.x - cx);
        ta.total_cmp(&tb)
    });

    let start = (0..4)
        .min_by(|&i, &j| {
            let (a, b) = (&sorted[i], &sorted[j]);
            (a.x + a.y)
                .total_cmp(&(b.x + b.y))
                .then(a.y.total_cmp(&b.y))
        })
        .unwrap_or(0);
    sorted.rotate_left(start);
    sorted
}

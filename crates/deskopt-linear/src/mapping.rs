//! Pixel -> desk-centimeter mapping.
//!
//! The desk frame has its origin at the configured reference corner. `x`
//! runs along the user edge (towards the other end of that edge) and `y`
//! runs perpendicular to it into the desk, so `y` is the distance from the
//! user edge that ergonomic rules are written against.
//!
//! Without a desk boundary the same construction is applied to the
//! calibration card itself; callers detect this degraded mode through
//! [`CoordinateMapper::boundary_known`].
//!
//! Rotations are mapped per point: a one-pixel step along the item's facing
//! direction is pushed through the transform, so keystoned photos (where
//! "up the photo" changes across the image) still give desk-frame angles.

use crate::{Calibration, CalibrationError, Quad, ScanTransform};
use deskopt_core::{
    CalibrationConfig, MappingConfig, Pt2, Real, ReferenceCorner, Vec2, direction_deg,
    point_in_convex_polygon, wrap_degrees,
};
use log::debug;
use serde::{Deserialize, Serialize};

/// Four clicked desk corners, validated like the calibration quad.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeskBoundary {
    quad: Quad,
}

impl DeskBoundary {
    pub fn new(clicks: &[Pt2], config: &CalibrationConfig) -> Result<Self, CalibrationError> {
        Ok(Self {
            quad: Quad::from_clicks(clicks, config)?,
        })
    }

    pub fn quad(&self) -> &Quad {
        &self.quad
    }
}

/// Desk size measured through the calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeskDimensions {
    /// Mean length of the user edge and the opposite edge.
    pub width_cm: Real,
    /// Mean length of the two side edges.
    pub depth_cm: Real,
}

/// A pixel position expressed in the desk frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MappedPosition {
    /// Along the user edge, from the reference corner.
    pub x_cm: Real,
    /// Away from the user edge. Negative means behind it.
    pub y_cm: Real,
    /// Rotation in the desk frame, degrees in `[-180, 180)`.
    pub rotation_deg: Real,
    /// Whether the point lies inside the quad that defines the frame
    /// (desk boundary, or the card in degraded mode).
    pub inside_reference_area: bool,
}

impl MappedPosition {
    /// Distance from the user edge.
    pub fn distance_cm(&self) -> Real {
        self.y_cm
    }

    pub fn point(&self) -> Pt2 {
        Pt2::new(self.x_cm, self.y_cm)
    }
}

/// Maps detections of one scan into desk centimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    transform: ScanTransform,
    origin_cm: Pt2,
    ex: Vec2,
    ey: Vec2,
    outline_cm: [Pt2; 4],
    boundary_known: bool,
    rotation_delta_deg: Real,
    rotation_epsilon_deg: Real,
    desk_dimensions: Option<DeskDimensions>,
}

impl CoordinateMapper {
    /// Build the desk frame for a calibrated scan.
    ///
    /// Fails only when the frame quad cannot be mapped (a corner on the
    /// homography's vanishing line) or collapses in centimeter space.
    pub fn new(
        calibration: &Calibration,
        boundary: Option<&DeskBoundary>,
        config: &MappingConfig,
    ) -> Result<Self, CalibrationError> {
        let (frame_quad, boundary_known) = match boundary {
            Some(b) => (*b.quad(), true),
            None => (calibration.quad, false),
        };
        let transform = calibration.transform.clone();

        let mut outline_cm = [Pt2::origin(); 4];
        for (dst, px) in outline_cm.iter_mut().zip(frame_quad.corners()) {
            *dst = transform.map_point(px).ok_or_else(|| {
                CalibrationError::degenerate("frame corner maps beyond the horizon")
            })?;
        }

        let corner = config.reference_corner;
        let origin_cm = outline_cm[corner.index()];
        let along = outline_cm[corner.along_user_edge().index()] - origin_cm;
        let across = outline_cm[corner.across_desk().index()] - origin_cm;

        let along_len = along.norm();
        if along_len <= Real::EPSILON {
            return Err(CalibrationError::degenerate("user edge has zero length"));
        }
        let ex = along / along_len;
        let mut ey = Vec2::new(-ex.y, ex.x);
        let depth = across.dot(&ey);
        if depth.abs() <= Real::EPSILON {
            return Err(CalibrationError::degenerate("desk frame has zero depth"));
        }
        if depth < 0.0 {
            ey = -ey;
        }

        let rotation_delta_deg =
            rotation_delta(&frame_quad, corner, config.rotation_epsilon_deg);

        let desk_dimensions = boundary_known.then(|| {
            let c = &outline_cm;
            DeskDimensions {
                width_cm: 0.5 * ((c[1] - c[0]).norm() + (c[2] - c[3]).norm()),
                depth_cm: 0.5 * ((c[3] - c[0]).norm() + (c[2] - c[1]).norm()),
            }
        });

        debug!(
            "desk frame: boundary_known={}, rotation_delta={:.2} deg, dims={:?}",
            boundary_known, rotation_delta_deg, desk_dimensions
        );

        Ok(Self {
            transform,
            origin_cm,
            ex,
            ey,
            outline_cm,
            boundary_known,
            rotation_delta_deg,
            rotation_epsilon_deg: config.rotation_epsilon_deg,
            desk_dimensions,
        })
    }

    /// False in degraded mode (positions are relative to the card).
    pub fn boundary_known(&self) -> bool {
        self.boundary_known
    }

    /// Tilt of the desk's side edge in the photo; `0` when negligible.
    ///
    /// This is a whole-photo summary. [`map`](Self::map) corrects each
    /// point's rotation locally.
    pub fn rotation_delta_deg(&self) -> Real {
        self.rotation_delta_deg
    }

    /// Desk size, when a boundary was supplied.
    pub fn desk_dimensions(&self) -> Option<DeskDimensions> {
        self.desk_dimensions
    }

    /// Map a pixel position and image-frame rotation into the desk frame.
    ///
    /// Points outside the image or behind the user edge are mapped as-is;
    /// `None` only when the pixel lies on the homography's vanishing line.
    pub fn map(&self, px: &Pt2, rotation_deg: Real) -> Option<MappedPosition> {
        let cm = self.transform.map_point(px)?;
        let d = cm - self.origin_cm;
        let rotation_deg = self
            .local_rotation(px, &cm, rotation_deg)
            .unwrap_or_else(|| self.map_rotation(rotation_deg));
        Some(MappedPosition {
            x_cm: d.dot(&self.ex),
            y_cm: d.dot(&self.ey),
            rotation_deg,
            inside_reference_area: point_in_convex_polygon(&self.outline_cm, &cm),
        })
    }

    /// Desk-frame rotation of an item facing `rotation_deg` at `px`.
    ///
    /// Image rotation 0 faces up the photo, positive is clockwise. `None`
    /// when the step leaves the mappable half-plane.
    fn local_rotation(&self, px: &Pt2, cm: &Pt2, rotation_deg: Real) -> Option<Real> {
        let (s, c) = rotation_deg.to_radians().sin_cos();
        let ahead = self.transform.map_point(&(*px + Vec2::new(s, -c)))?;
        let facing = ahead - *cm;
        if facing.norm() <= Real::EPSILON {
            return None;
        }
        let local = wrap_degrees(direction_deg(&facing) - direction_deg(&self.ey));
        if wrap_degrees(rotation_deg - local).abs() < self.rotation_epsilon_deg {
            Some(rotation_deg)
        } else {
            Some(local)
        }
    }

    /// Whole-photo rotation correction, used when no local one is available.
    pub fn map_rotation(&self, rotation_deg: Real) -> Real {
        if self.rotation_delta_deg == 0.0 {
            rotation_deg
        } else {
            wrap_degrees(rotation_deg - self.rotation_delta_deg)
        }
    }
}

/// How far the "into the desk" direction is rotated from straight up the
/// photo (for a user edge at the bottom) or straight down (user edge at the top).
fn rotation_delta(quad: &Quad, corner: ReferenceCorner, epsilon_deg: Real) -> Real {
    let into_desk = quad.corner(corner.across_desk()) - quad.corner(corner);
    let delta = wrap_degrees(direction_deg(&into_desk) + 90.0);
    if delta.abs() < epsilon_deg {
        0.0
    } else {
        delta
    }
}

//! Synthetic desk photographs with known ground truth.
//!
//! A [`SyntheticDesk`] is a homography from desk centimeters to image pixels.
//! The desk frame matches the engine's default convention: origin at the
//! corner nearest the user on the left, `x` along the user edge, `y` away
//! from the user. In an upright top-down photo the user edge is the bottom
//! of the image.

use crate::{
    DetectedItem, Mat3, Pt2, Real, Vec2, direction_deg, from_homogeneous, to_homogeneous,
    wrap_degrees,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticDesk {
    /// Desk centimeters -> image pixels.
    pub desk_to_px: Mat3,
    pub width_cm: Real,
    pub depth_cm: Real,
}

impl SyntheticDesk {
    /// Upright top-down photo: `px_per_cm` pixels per centimeter, the desk's
    /// user-side left corner at `bottom_left_px`.
    pub fn top_down(width_cm: Real, depth_cm: Real, px_per_cm: Real, bottom_left_px: Pt2) -> Self {
        let desk_to_px = Mat3::new(
            px_per_cm,
            0.0,
            bottom_left_px.x,
            0.0,
            -px_per_cm,
            bottom_left_px.y,
            0.0,
            0.0,
            1.0,
        );
        Self {
            desk_to_px,
            width_cm,
            depth_cm,
        }
    }

    /// Rotate the photo content by `angle_deg` about the desk origin pixel.
    pub fn rotated(mut self, angle_deg: Real) -> Self {
        let o = self.project(&Pt2::origin());
        let (s, c) = angle_deg.to_radians().sin_cos();
        let to_origin = Mat3::new(1.0, 0.0, -o.x, 0.0, 1.0, -o.y, 0.0, 0.0, 1.0);
        let rot = Mat3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0);
        let back = Mat3::new(1.0, 0.0, o.x, 0.0, 1.0, o.y, 0.0, 0.0, 1.0);
        self.desk_to_px = back * rot * to_origin * self.desk_to_px;
        self
    }

    /// Add a projective (keystone) term on the desk side; the desk origin
    /// stays at the same pixel.
    pub fn with_perspective(mut self, gx: Real, gy: Real) -> Self {
        let p = Mat3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, gx, gy, 1.0);
        self.desk_to_px *= p;
        self
    }

    pub fn project(&self, desk_cm: &Pt2) -> Pt2 {
        from_homogeneous(&(self.desk_to_px * to_homogeneous(desk_cm)))
    }

    /// Desk outline in pixels, clockwise from the far-left corner.
    pub fn desk_corners_px(&self) -> Vec<Pt2> {
        [
            Pt2::new(0.0, self.depth_cm),
            Pt2::new(self.width_cm, self.depth_cm),
            Pt2::new(self.width_cm, 0.0),
            Pt2::new(0.0, 0.0),
        ]
        .iter()
        .map(|p| self.project(p))
        .collect()
    }

    /// Corners of a card lying flat on the desk, long edge parallel to the
    /// user edge, centered at `center_cm`.
    pub fn card_corners_px(&self, center_cm: Pt2, width_cm: Real, height_cm: Real) -> Vec<Pt2> {
        let hw = 0.5 * width_cm;
        let hh = 0.5 * height_cm;
        [
            Pt2::new(center_cm.x - hw, center_cm.y + hh),
            Pt2::new(center_cm.x + hw, center_cm.y + hh),
            Pt2::new(center_cm.x + hw, center_cm.y - hh),
            Pt2::new(center_cm.x - hw, center_cm.y - hh),
        ]
        .iter()
        .map(|p| self.project(p))
        .collect()
    }

    /// A triaged-correct detection at a desk position with a desk-frame rotation.
    ///
    /// The image rotation is the photographed direction of a short step along
    /// the item's facing, so it includes local perspective distortion.
    pub fn detection(&self, slug: &str, desk_cm: Pt2, rotation_deg: Real) -> DetectedItem {
        let px = self.project(&desk_cm);
        let (s, c) = rotation_deg.to_radians().sin_cos();
        let ahead = self.project(&(desk_cm + Vec2::new(s, c)));
        let image_rotation = wrap_degrees(direction_deg(&(ahead - px)) + 90.0);
        DetectedItem::new(slug, px.x, px.y, image_rotation)
    }
}

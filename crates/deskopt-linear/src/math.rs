//! Numerical helpers shared by the linear solvers.

use deskopt_core::{Mat3, Pt2};

/// Hartley normalization of 2D points.
///
/// Translates the centroid to the origin and scales so the mean distance to
/// it is `sqrt(2)`. Returns the normalized points and the 3x3 transform `T`
/// with `p_n = T p`, or `None` when all points coincide.
pub fn normalize_points_2d(points: &[Pt2]) -> Option<(Vec<Pt2>, Mat3)> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let centroid = points
        .iter()
        .fold(Pt2::origin(), |acc, p| Pt2::new(acc.x + p.x, acc.y + p.y));
    let cx = centroid.x / n;
    let cy = centroid.y / n;

    let mean_dist = points
        .iter()
        .map(|p| ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt())
        .sum::<f64>()
        / n;

    if mean_dist <= f64::EPSILON {
        return None;
    }

    let scale = 2.0_f64.sqrt() / mean_dist;
    let t = Mat3::new(
        scale,
        0.0,
        -scale * cx,
        0.0,
        scale,
        -scale * cy,
        0.0,
        0.0,
        1.0,
    );

    let norm = points
        .iter()
        .map(|p| Pt2::new((p.x - cx) * scale, (p.y - cy) * scale))
        .collect();

    Some((norm, t))
}

//! Plane-to-plane homography from point correspondences.
//!
//! Normalized Direct Linear Transform: `dst ~ H src`. With exactly four
//! correspondences in general position the solution is exact.

use crate::math::normalize_points_2d;
use deskopt_core::{Mat3, Pt2, apply_homography};
use nalgebra::DMatrix;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HomographyError {
    #[error("need at least 4 point correspondences, got {0}")]
    NotEnoughPoints(usize),
    #[error("degenerate point configuration for normalization")]
    Degenerate,
    #[error("svd failed")]
    SvdFailed,
    #[error("homography is singular")]
    Singular,
}

/// Estimate `H` such that `dst ~ H src` using the normalized DLT.
///
/// The result is scaled so that `H[2,2] == 1` when possible.
pub fn dlt_homography(src: &[Pt2], dst: &[Pt2]) -> Result<Mat3, HomographyError> {
    let n = src.len();
    if n < 4 || dst.len() != n {
        return Err(HomographyError::NotEnoughPoints(n.min(dst.len())));
    }

    let (src_n, t_src) = normalize_points_2d(src).ok_or(HomographyError::Degenerate)?;
    let (dst_n, t_dst) = normalize_points_2d(dst).ok_or(HomographyError::Degenerate)?;

    let mut a = DMatrix::<f64>::zeros(2 * n, 9);

    for (i, (ps, pd)) in src_n.iter().zip(dst_n.iter()).enumerate() {
        let x = ps.x;
        let y = ps.y;
        let u = pd.x;
        let v = pd.y;

        let r0 = 2 * i;
        let r1 = 2 * i + 1;

        a[(r0, 0)] = -x;
        a[(r0, 1)] = -y;
        a[(r0, 2)] = -1.0;
        a[(r0, 6)] = u * x;
        a[(r0, 7)] = u * y;
        a[(r0, 8)] = u;

        a[(r1, 3)] = -x;
        a[(r1, 4)] = -y;
        a[(r1, 5)] = -1.0;
        a[(r1, 6)] = v * x;
        a[(r1, 7)] = v * y;
        a[(r1, 8)] = v;
    }

    // Four correspondences give an 8x9 system; pad to square so the SVD
    // exposes the null-space vector.
    if a.nrows() < a.ncols() {
        let rows = a.nrows();
        let cols = a.ncols();
        let mut padded = DMatrix::<f64>::zeros(cols, cols);
        padded.view_mut((0, 0), (rows, cols)).copy_from(&a);
        a = padded;
    }

    let svd = a.svd(true, true);
    let v_t = svd.v_t.ok_or(HomographyError::SvdFailed)?;

    // Singular values are not guaranteed sorted; take the smallest one.
    let (min_idx, _) = svd
        .singular_values
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |best, (i, &s)| {
            if s < best.1 { (i, s) } else { best }
        });
    let h_vec = v_t.row(min_idx);

    let mut h_mat = Mat3::zeros();
    for r in 0..3 {
        for c in 0..3 {
            h_mat[(r, c)] = h_vec[3 * r + c];
        }
    }

    let t_dst_inv = t_dst.try_inverse().ok_or(HomographyError::Singular)?;
    h_mat = t_dst_inv * h_mat * t_src;

    let scale = h_mat[(2, 2)];
    if scale.abs() > f64::EPSILON {
        h_mat /= scale;
    }

    if h_mat.determinant().abs() <= f64::EPSILON {
        return Err(HomographyError::Singular);
    }

    Ok(h_mat)
}

/// Largest distance between `H src_i` and `dst_i`.
pub fn max_transfer_error(h: &Mat3, src: &[Pt2], dst: &[Pt2]) -> f64 {
    src.iter()
        .zip(dst.iter())
        .map(|(s, d)| match apply_homography(h, s) {
            Some(p) => (p - d).norm(),
            None => f64::INFINITY,
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_scale_homography() {
        let src = vec![
            Pt2::new(0.0, 0.0),
            Pt2::new(1.0, 0.0),
            Pt2::new(1.0, 1.0),
            Pt2::new(0.0, 1.0),
        ];
        let dst = vec![
            Pt2::new(0.0, 0.0),
            Pt2::new(2.0, 0.0),
            Pt2::new(2.0, 2.0),
            Pt2::new(0.0, 2.0),
        ];

        let h = dlt_homography(&src, &dst).unwrap();
        assert!((h[(0, 0)] - 2.0).abs() < 1e-9);
        assert!(max_transfer_error(&h, &src, &dst) < 1e-9);
    }

    #[test]
    fn keystone_quad_maps_exactly_onto_rectangle() {
        let px = vec![
            Pt2::new(410.0, 300.0),
            Pt2::new(590.0, 305.0),
            Pt2::new(620.0, 420.0),
            Pt2::new(380.0, 410.0),
        ];
        let cm = vec![
            Pt2::new(0.0, 0.0),
            Pt2::new(8.5, 0.0),
            Pt2::new(8.5, 5.4),
            Pt2::new(0.0, 5.4),
        ];
        let h = dlt_homography(&px, &cm).unwrap();
        assert!(max_transfer_error(&h, &px, &cm) < 1e-8);
    }

    #[test]
    fn rejects_mismatched_inputs() {
        let src = vec![Pt2::new(0.0, 0.0); 3];
        let dst = vec![Pt2::new(0.0, 0.0); 3];
        assert_eq!(
            dlt_homography(&src, &dst),
            Err(HomographyError::NotEnoughPoints(3))
        );
    }
}

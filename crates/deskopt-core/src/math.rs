use nalgebra::{Matrix3, Point2, Vector2, Vector3};

pub type Real = f64;

pub type Vec2 = Vector2<Real>;
pub type Vec3 = Vector3<Real>;
pub type Pt2 = Point2<Real>;
pub type Mat3 = Matrix3<Real>;

pub fn to_homogeneous(p: &Pt2) -> Vec3 {
    Vec3::new(p.x, p.y, 1.0)
}

pub fn from_homogeneous(v: &Vec3) -> Pt2 {
    Pt2::new(v.x / v.z, v.y / v.z)
}

/// Apply a planar homography to a point.
///
/// Returns `None` when the point maps onto the line at infinity.
pub fn apply_homography(h: &Mat3, p: &Pt2) -> Option<Pt2> {
    let v = h * to_homogeneous(p);
    if v.z.abs() <= Real::EPSILON {
        return None;
    }
    Some(from_homogeneous(&v))
}

/// Wrap an angle in degrees into `[-180, 180)`.
pub fn wrap_degrees(deg: Real) -> Real {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Smallest signed difference `a - b` in degrees, wrapped into `[-180, 180)`.
pub fn angle_difference_deg(a: Real, b: Real) -> Real {
    wrap_degrees(a - b)
}

/// Direction angle of a vector in degrees (`atan2(y, x)`).
pub fn direction_deg(v: &Vec2) -> Real {
    v.y.atan2(v.x).to_degrees()
}

/// Z component of the cross product `(b - a) x (c - b)`.
///
/// Positive for a clockwise turn in image coordinates (y pointing down).
pub fn turn(a: &Pt2, b: &Pt2, c: &Pt2) -> Real {
    let ab = b - a;
    let bc = c - b;
    ab.x * bc.y - ab.y * bc.x
}

/// Signed shoelace area of a polygon (positive when clockwise in image coordinates).
pub fn polygon_signed_area(points: &[Pt2]) -> Real {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..n {
        let p = &points[i];
        let q = &points[(i + 1) % n];
        acc += p.x * q.y - q.x * p.y;
    }
    0.5 * acc
}

/// Point-in-convex-polygon test (vertices in either winding, boundary counts as inside).
pub fn point_in_convex_polygon(poly: &[Pt2], p: &Pt2) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let mut sign = 0.0;
    for i in 0..n {
        let a = &poly[i];
        let b = &poly[(i + 1) % n];
        let e = b - a;
        let d = p - a;
        let cross = e.x * d.y - e.y * d.x;
        if cross.abs() <= 1e-12 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

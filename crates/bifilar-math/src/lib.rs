#![warn(missing_docs)]

//! Math types for the bifilar coil mesh builder.
//!
//! Thin wrappers around nalgebra providing the handful of types the
//! builder needs: points and vectors, cylindrical-coordinate helpers,
//! oriented triangles, and tolerance constants.

use nalgebra::{Unit, Vector3};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in the XY plane.
pub type Point2 = nalgebra::Point2<f64>;

/// Point at `radius` and `angle` (radians, about +Z) at height `z`.
pub fn polar(radius: f64, angle: f64, z: f64) -> Point3 {
    let (s, c) = angle.sin_cos();
    Point3::new(radius * c, radius * s, z)
}

/// Horizontal unit vector pointing at `angle` radians about +Z.
pub fn radial_dir(angle: f64) -> Dir3 {
    let (s, c) = angle.sin_cos();
    Dir3::new_unchecked(Vec3::new(c, s, 0.0))
}

/// Angle of `p` about the Z axis, in `(-π, π]`.
pub fn polar_angle(p: &Point3) -> f64 {
    p.y.atan2(p.x)
}

/// Distance of `p` from the Z axis.
pub fn radial_distance(p: &Point3) -> f64 {
    p.x.hypot(p.y)
}

/// Copy of `p` with its Z coordinate replaced.
pub fn with_z(p: &Point3, z: f64) -> Point3 {
    Point3::new(p.x, p.y, z)
}

/// Projection of `p` onto the XY plane.
pub fn xy(p: &Point3) -> Point2 {
    Point2::new(p.x, p.y)
}

/// A triangle with an explicit facet normal.
///
/// The normal follows the right-hand rule over the vertex order, so the
/// winding decides which side of the surface is "outside".
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Unit facet normal, or zero for a degenerate triangle.
    pub normal: Vec3,
    /// The three corners in winding order.
    pub vertices: [Point3; 3],
}

impl Triangle {
    /// Build a triangle from three corners, computing the normal from
    /// `(v2 - v1) × (v3 - v1)`.
    pub fn new(v1: Point3, v2: Point3, v3: Point3) -> Self {
        let n = (v2 - v1).cross(&(v3 - v1));
        let normal = n.try_normalize(f64::EPSILON).unwrap_or_else(Vec3::zeros);
        Self {
            normal,
            vertices: [v1, v2, v3],
        }
    }

    /// Surface area.
    pub fn area(&self) -> f64 {
        let [a, b, c] = &self.vertices;
        0.5 * (b - a).cross(&(c - a)).norm()
    }

    /// True when the corners are collinear (zero normal).
    pub fn is_degenerate(&self) -> bool {
        self.normal == Vec3::zeros()
    }
}

/// A non-vertical line in the XY plane in slope-intercept form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeLine {
    /// Rise over run.
    pub slope: f64,
    /// Y value at `x = 0`.
    pub intercept: f64,
}

impl SlopeLine {
    /// Line through `a` and `b`, or `None` when the line is vertical.
    pub fn through(a: &Point2, b: &Point2) -> Option<Self> {
        let run = a.x - b.x;
        if Tolerance::DEFAULT.is_zero(run) {
            return None;
        }
        let slope = (a.y - b.y) / run;
        Some(Self {
            slope,
            intercept: a.y - slope * a.x,
        })
    }

    /// Signed distance from `p` to the line.
    ///
    /// Positive below the line (`y < slope * x + intercept`).
    pub fn signed_distance(&self, p: &Point2) -> f64 {
        (self.slope * p.x - p.y + self.intercept) / self.slope.hypot(1.0)
    }
}

/// Linear tolerance for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Distance tolerance in mm.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance of 1e-6 mm.
    pub const DEFAULT: Self = Self { linear: 1e-6 };

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() < self.linear
    }

    /// Integer lattice key for `p`, used to weld coincident vertices.
    pub fn weld_key(&self, p: &Point3) -> [i64; 3] {
        let q = |v: f64| (v / self.linear).round() as i64;
        [q(p.x), q(p.y), q(p.z)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_polar_quarter_turn() {
        let p = polar(2.0, PI / 2.0, 5.0);
        assert!(p.x.abs() < 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 5.0);
    }

    #[test]
    fn test_polar_roundtrip_angle_and_radius() {
        let p = polar(3.5, 2.0, -1.0);
        assert_relative_eq!(polar_angle(&p), 2.0, epsilon = 1e-12);
        assert_relative_eq!(radial_distance(&p), 3.5, epsilon = 1e-12);
    }

    #[test]
    fn test_radial_dir_is_unit() {
        let d = radial_dir(0.7);
        assert_relative_eq!(d.as_ref().norm(), 1.0, epsilon = 1e-12);
        assert_eq!(d.as_ref().z, 0.0);
    }

    #[test]
    fn test_triangle_normal_ccw() {
        let t = Triangle::new(
            Point3::origin(),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(t.normal, Vec3::z(), epsilon = 1e-12);
        assert_relative_eq!(t.area(), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_triangle_has_zero_normal() {
        let t = Triangle::new(
            Point3::origin(),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        );
        assert!(t.is_degenerate());
        assert!(t.normal.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn test_slope_line_signed_distance() {
        // y = x
        let line = SlopeLine::through(&Point2::new(0.0, 0.0), &Point2::new(1.0, 1.0)).unwrap();
        assert_relative_eq!(line.slope, 1.0);
        assert_relative_eq!(line.intercept, 0.0);
        let below = line.signed_distance(&Point2::new(1.0, 0.0));
        let above = line.signed_distance(&Point2::new(0.0, 1.0));
        assert_relative_eq!(below, 1.0 / 2f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(above, -1.0 / 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_slope_line_vertical_is_none() {
        assert!(SlopeLine::through(&Point2::new(1.0, 0.0), &Point2::new(1.0, 5.0)).is_none());
    }

    #[test]
    fn test_tolerance_is_zero() {
        let tol = Tolerance::DEFAULT;
        assert!(tol.is_zero(-5e-7));
        assert!(!tol.is_zero(2e-6));
    }

    #[test]
    fn test_weld_key_merges_nearby_points() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 1e-9, 2.0 - 1e-9, 3.0);
        assert_eq!(tol.weld_key(&a), tol.weld_key(&b));
        assert_ne!(tol.weld_key(&a), tol.weld_key(&Point3::new(1.0, 2.0, 3.1)));
    }
}

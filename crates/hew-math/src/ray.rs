use serde::{Deserialize, Serialize};

use crate::{Point3, Vector3};

/// A ray in 3D space defined by origin and direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Point3, direction: Vector3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at parameter t.
    pub fn at(&self, t: f32) -> Point3 {
        self.origin + self.direction * t
    }

    /// Find the closest point on the ray to a given point.
    pub fn closest_point(&self, point: Point3) -> Point3 {
        let t = (point - self.origin).dot(self.direction).max(0.0);
        self.at(t)
    }

    /// Distance from a point to the ray.
    pub fn distance_to_point(&self, point: Point3) -> f32 {
        (point - self.closest_point(point)).length()
    }

    /// Parameter of the closest point on the ray to a given point.
    pub fn project_point(&self, point: Point3) -> f32 {
        (point - self.origin).dot(self.direction).max(0.0)
    }

    /// Möller–Trumbore ray/triangle intersection (double-sided).
    ///
    /// Returns the ray parameter t of the hit, or `None` if the ray misses
    /// or the triangle is degenerate.
    pub fn intersect_triangle(&self, v0: Point3, v1: Point3, v2: Point3) -> Option<f32> {
        const EPS: f32 = 1e-7;

        let e1 = v1 - v0;
        let e2 = v2 - v0;
        let p = self.direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() < EPS {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - v0;
        let u = s.dot(p) * inv_det;
        if !(-EPS..=1.0 + EPS).contains(&u) {
            return None;
        }

        let q = s.cross(e1);
        let v = self.direction.dot(q) * inv_det;
        if v < -EPS || u + v > 1.0 + EPS {
            return None;
        }

        let t = e2.dot(q) * inv_det;
        if t > EPS {
            Some(t)
        } else {
            None
        }
    }

    /// Closest approach between the ray and a segment `[a, b]`.
    ///
    /// Returns `(t, s)`: the ray parameter (clamped to t >= 0) and the
    /// segment parameter (clamped to [0, 1]) of the closest point pair.
    pub fn closest_to_segment(&self, a: Point3, b: Point3) -> (f32, f32) {
        let u = b - a;
        let w0 = self.origin - a;

        let aa = self.direction.dot(self.direction);
        let bb = self.direction.dot(u);
        let cc = u.dot(u);
        let dd = self.direction.dot(w0);
        let ee = u.dot(w0);

        // Degenerate segment: treat as a point
        if cc < 1e-12 {
            return (self.project_point(a), 0.0);
        }

        let denom = aa * cc - bb * bb;
        let mut s = if denom.abs() < 1e-12 {
            // Parallel: pick the segment start
            0.0
        } else {
            ((aa * ee - bb * dd) / denom).clamp(0.0, 1.0)
        };

        let mut t = (s * bb - dd) / aa;
        if t < 0.0 {
            t = 0.0;
            s = (ee / cc).clamp(0.0, 1.0);
        }
        (t, s)
    }

    /// Distance between the ray and a segment `[a, b]`.
    pub fn distance_to_segment(&self, a: Point3, b: Point3) -> f32 {
        let (t, s) = self.closest_to_segment(a, b);
        (self.at(t) - (a + (b - a) * s)).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::vec3;

    #[test]
    fn test_at() {
        let ray = Ray::new(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0));
        let p = ray.at(5.0);
        assert!((p - vec3(5.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_distance_to_point() {
        let ray = Ray::new(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0));
        let dist = ray.distance_to_point(vec3(5.0, 3.0, 0.0));
        assert!((dist - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_intersect_triangle_hit() {
        let ray = Ray::new(vec3(0.25, 0.25, -1.0), vec3(0.0, 0.0, 1.0));
        let t = ray
            .intersect_triangle(
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(0.0, 1.0, 0.0),
            )
            .unwrap();
        assert_relative_eq!(t, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_intersect_triangle_miss() {
        let ray = Ray::new(vec3(2.0, 2.0, -1.0), vec3(0.0, 0.0, 1.0));
        assert!(ray
            .intersect_triangle(
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(0.0, 1.0, 0.0),
            )
            .is_none());
    }

    #[test]
    fn test_intersect_triangle_behind_origin() {
        let ray = Ray::new(vec3(0.25, 0.25, 1.0), vec3(0.0, 0.0, 1.0));
        assert!(ray
            .intersect_triangle(
                vec3(0.0, 0.0, 0.0),
                vec3(1.0, 0.0, 0.0),
                vec3(0.0, 1.0, 0.0),
            )
            .is_none());
    }

    #[test]
    fn test_distance_to_segment_crossing() {
        // Ray along X at y=1, segment along Y at x=5
        let ray = Ray::new(vec3(0.0, 1.0, 0.0), vec3(1.0, 0.0, 0.0));
        let d = ray.distance_to_segment(vec3(5.0, -2.0, 0.0), vec3(5.0, 2.0, 0.0));
        assert_relative_eq!(d, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_distance_to_segment_clamped_end() {
        let ray = Ray::new(vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0));
        // Segment entirely above, nearest at its lower end
        let d = ray.distance_to_segment(vec3(3.0, 2.0, 0.0), vec3(3.0, 5.0, 0.0));
        assert_relative_eq!(d, 2.0, epsilon = 1e-5);
    }
}

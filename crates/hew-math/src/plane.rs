use hew_core::Tolerance;
use serde::{Deserialize, Serialize};

use crate::{pca, Point3, Vector3};

/// A plane in 3D space defined by a point and normal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Point3,
    pub normal: Vector3,
}

impl Plane {
    pub fn new(origin: Point3, normal: Vector3) -> Self {
        Self {
            origin,
            normal: normal.normalize(),
        }
    }

    pub fn xy() -> Self {
        Self::new(Point3::ZERO, Vector3::Z)
    }

    pub fn xz() -> Self {
        Self::new(Point3::ZERO, Vector3::Y)
    }

    pub fn yz() -> Self {
        Self::new(Point3::ZERO, Vector3::X)
    }

    /// Signed distance from a point to this plane.
    pub fn signed_distance(&self, point: Point3) -> f32 {
        (point - self.origin).dot(self.normal)
    }

    /// Project a point onto this plane.
    pub fn project_point(&self, point: Point3) -> Point3 {
        point - self.normal * self.signed_distance(point)
    }

    /// Classify a point against the plane: +1 above, -1 below, 0 on it.
    pub fn classify_point(&self, point: Point3, tol: &Tolerance) -> i8 {
        tol.plane_sign(self.signed_distance(point))
    }

    /// Best-fit plane through a point cloud (least-squares via PCA).
    ///
    /// Returns `None` for fewer than 3 points or a degenerate (collinear)
    /// cloud whose normal cannot be determined.
    pub fn best_fit(points: &[Point3]) -> Option<Self> {
        let pca = pca::principal_axes(points)?;
        let normal = pca.axes[2];
        if normal.length_squared() < 1e-12 {
            return None;
        }
        Some(Self {
            origin: pca.centroid,
            normal,
        })
    }
}

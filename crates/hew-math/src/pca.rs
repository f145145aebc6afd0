use std::cmp::Ordering;

use nalgebra::Matrix3;

use crate::{Point3, Vector3};

/// Principal axes of a point cloud, sorted by descending variance.
///
/// `axes[0]` is the direction of greatest spread, `axes[2]` the least
/// (the best-fit plane normal for near-planar clouds).
#[derive(Debug, Clone, Copy)]
pub struct PrincipalAxes {
    pub centroid: Point3,
    pub axes: [Vector3; 3],
    pub variances: [f32; 3],
}

pub fn centroid(points: &[Point3]) -> Point3 {
    if points.is_empty() {
        return Point3::ZERO;
    }
    points.iter().copied().sum::<Point3>() / points.len() as f32
}

/// Eigen-decompose the covariance matrix of a point cloud.
///
/// Returns `None` for fewer than 3 points (no meaningful spread).
pub fn principal_axes(points: &[Point3]) -> Option<PrincipalAxes> {
    if points.len() < 3 {
        return None;
    }

    let center = centroid(points);
    let mut cov = Matrix3::<f32>::zeros();
    for &p in points {
        let d = p - center;
        cov[(0, 0)] += d.x * d.x;
        cov[(0, 1)] += d.x * d.y;
        cov[(0, 2)] += d.x * d.z;
        cov[(1, 1)] += d.y * d.y;
        cov[(1, 2)] += d.y * d.z;
        cov[(2, 2)] += d.z * d.z;
    }
    cov[(1, 0)] = cov[(0, 1)];
    cov[(2, 0)] = cov[(0, 2)];
    cov[(2, 1)] = cov[(1, 2)];
    cov /= points.len() as f32;

    let eigen = cov.symmetric_eigen();

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[b]
            .partial_cmp(&eigen.eigenvalues[a])
            .unwrap_or(Ordering::Equal)
    });

    let mut axes = [Vector3::ZERO; 3];
    let mut variances = [0.0f32; 3];
    for (slot, &i) in order.iter().enumerate() {
        let col = eigen.eigenvectors.column(i);
        axes[slot] = Vector3::new(col[0], col[1], col[2]).normalize_or_zero();
        variances[slot] = eigen.eigenvalues[i];
    }

    Some(PrincipalAxes {
        centroid: center,
        axes,
        variances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::vec3;

    #[test]
    fn test_centroid() {
        let pts = vec![vec3(0.0, 0.0, 0.0), vec3(2.0, 0.0, 0.0), vec3(1.0, 3.0, 0.0)];
        let c = centroid(&pts);
        assert_relative_eq!(c.x, 1.0);
        assert_relative_eq!(c.y, 1.0);
    }

    #[test]
    fn test_dominant_axis_of_elongated_cloud() {
        // Points stretched along X with small jitter in Y
        let pts: Vec<Point3> = (0..20)
            .map(|i| vec3(i as f32, (i % 2) as f32 * 0.1, 0.0))
            .collect();
        let pca = principal_axes(&pts).unwrap();
        assert!(pca.axes[0].x.abs() > 0.99, "dominant axis: {:?}", pca.axes[0]);
        assert!(pca.variances[0] > pca.variances[1]);
    }

    #[test]
    fn test_planar_cloud_normal() {
        // Points on the XY plane: least-variance axis must be Z
        let pts: Vec<Point3> = (0..16)
            .map(|i| vec3((i % 4) as f32, (i / 4) as f32, 0.0))
            .collect();
        let pca = principal_axes(&pts).unwrap();
        assert!(pca.axes[2].z.abs() > 0.99, "plane normal: {:?}", pca.axes[2]);
        assert_relative_eq!(pca.variances[2], 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_too_few_points() {
        assert!(principal_axes(&[Point3::ZERO, Point3::X]).is_none());
    }
}

/// Tolerance configuration for position matching and plane classification.
///
/// Every mesh carries one of these; welding, twin re-linking, and slicing
/// read it instead of hardcoded epsilons.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Linear tolerance for position/distance comparisons (in world units)
    pub linear: f32,
    /// Half-width of the band around a plane treated as "on the plane"
    pub planar: f32,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f32 = 1e-4;
    pub const DEFAULT_PLANAR: f32 = 1e-5;

    pub fn new(linear: f32, planar: f32) -> Self {
        Self { linear, planar }
    }

    pub fn default_precision() -> Self {
        Self {
            linear: Self::DEFAULT_LINEAR,
            planar: Self::DEFAULT_PLANAR,
        }
    }

    pub fn loose() -> Self {
        Self {
            linear: 1e-3,
            planar: 1e-4,
        }
    }

    pub fn tight() -> Self {
        Self {
            linear: 1e-6,
            planar: 1e-7,
        }
    }

    /// Check if two values are equal within linear tolerance
    pub fn linear_eq(self, a: f32, b: f32) -> bool {
        (a - b).abs() < self.linear
    }

    /// Check if a value is zero within linear tolerance
    pub fn is_zero(self, v: f32) -> bool {
        v.abs() < self.linear
    }

    /// Classify a signed plane distance: +1 above, -1 below, 0 within the band
    pub fn plane_sign(self, d: f32) -> i8 {
        if d > self.planar {
            1
        } else if d < -self.planar {
            -1
        } else {
            0
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_sign() {
        let tol = Tolerance::default();
        assert_eq!(tol.plane_sign(0.5), 1);
        assert_eq!(tol.plane_sign(-0.5), -1);
        assert_eq!(tol.plane_sign(1e-6), 0);
        assert_eq!(tol.plane_sign(-1e-6), 0);
    }

    #[test]
    fn test_linear_eq() {
        let tol = Tolerance::default();
        assert!(tol.linear_eq(1.0, 1.0 + 5e-5));
        assert!(!tol.linear_eq(1.0, 1.001));
    }
}

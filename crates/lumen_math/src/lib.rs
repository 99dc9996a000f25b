//! Lumen math - vector, ray and interval primitives.
//!
//! Vectors are `glam::Vec3`; this crate adds the small amount of ray tracing
//! specific algebra on top of it.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;

pub use interval::Interval;
pub use ray::Ray;

/// A position in world space.
pub type Point3 = Vec3;

/// Components smaller than this are treated as zero by [`near_zero`].
pub const NEAR_ZERO_EPSILON: f32 = 1e-8;

/// Returns true if the vector is close to zero in every dimension.
#[inline]
pub fn near_zero(v: Vec3) -> bool {
    v.abs().max_element() < NEAR_ZERO_EPSILON
}

/// Reflect `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::X.cross(Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_near_zero() {
        assert!(near_zero(Vec3::ZERO));
        assert!(near_zero(Vec3::new(1e-9, -1e-9, 0.0)));
        assert!(!near_zero(Vec3::new(0.0, 1e-3, 0.0)));
    }

    #[test]
    fn test_reflect() {
        // Ray coming down at 45 degrees bounces back up
        let v = Vec3::new(1.0, -1.0, 0.0);
        assert_eq!(reflect(v, Vec3::Y), Vec3::new(1.0, 1.0, 0.0));

        // Reflection preserves length
        let v = Vec3::new(0.3, -2.0, 0.7);
        let n = Vec3::new(0.0, 1.0, 1.0).normalize();
        assert!((reflect(v, n).length() - v.length()).abs() < 1e-5);
    }
}

//! Random sampling helpers shared by the camera and the materials.

use lumen_math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

/// Uniform `f32` in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Generate a random unit vector on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling for a uniform distribution on the sphere
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}

/// Sample a random point in the square [-0.5, 0.5] x [-0.5, 0.5].
pub fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}

/// Generator owned by a single pixel unit.
///
/// Seeded from the render seed and the pixel index only, so the image does
/// not depend on which worker picked the pixel up.
pub fn pixel_rng(seed: u64, pixel_index: usize) -> StdRng {
    StdRng::seed_from_u64(splitmix64(seed ^ splitmix64(pixel_index as u64)))
}

/// SplitMix64 finalizer.
fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_unit_vector_is_unit() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_sample_square_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let p = sample_square(&mut rng);
            assert!((-0.5..0.5).contains(&p.x));
            assert!((-0.5..0.5).contains(&p.y));
            assert_eq!(p.z, 0.0);
        }
    }

    #[test]
    fn test_pixel_rng_deterministic() {
        let a: u64 = pixel_rng(42, 17).gen();
        let b: u64 = pixel_rng(42, 17).gen();
        let c: u64 = pixel_rng(42, 18).gen();
        let d: u64 = pixel_rng(43, 17).gen();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }
}

//! Materials describing how light interacts with surfaces.

use lumen_math::{near_zero, reflect, Vec3};
use rand::RngCore;

use crate::sampling::random_unit_vector;
use crate::{HitRecord, Ray};

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Handle into a scene's material table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(u32);

impl MaterialId {
    /// The absorbing material every scene starts with.
    pub const DEFAULT: MaterialId = MaterialId(0);

    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for MaterialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of a successful scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Per-channel reduction applied to light arriving along `scattered`
    pub attenuation: Color,
    /// Outgoing ray, starting at the hit point
    pub scattered: Ray,
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn albedo(&self) -> Color {
        self.albedo
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }

    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction(), rec.normal).normalize();
        let scattered_dir = reflected + self.fuzz * random_unit_vector(rng);

        // Rays fuzzed below the surface are absorbed
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// The closed set of surface materials.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Material {
    /// Absorbs every ray. Used for unset materials.
    #[default]
    Absorb,
    Lambertian(Lambertian),
    Metal(Metal),
}

impl Material {
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian(Lambertian::new(albedo))
    }

    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal(Metal::new(albedo, fuzz))
    }

    /// Scatter an incoming ray.
    ///
    /// Returns the attenuation and scattered ray, or None if the ray is
    /// absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match self {
            Material::Absorb => None,
            Material::Lambertian(m) => m.scatter(ray_in, rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
        }
    }
}

//! Sphere primitive for ray tracing.

use crate::{
    hittable::{HitRecord, Hittable},
    MaterialId, Ray,
};
use lumen_math::{Interval, Point3};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Point3,
    radius: f32,
    material: MaterialId,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero, and a
    /// zero-radius sphere is never hit.
    pub fn new(center: Point3, radius: f32, material: MaterialId) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material,
        }
    }

    pub fn center(&self) -> Point3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> MaterialId {
        self.material
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        // A point has no surface normal
        if self.radius <= 0.0 {
            return None;
        }

        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(ray, root, outward_normal, self.material))
    }
}

//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use crate::{MaterialId, Ray};
use lumen_math::{Interval, Point3, Vec3};

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Point3,
    /// Unit surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: MaterialId,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl HitRecord {
    /// Build a record from an outward normal, orienting it against the ray.
    ///
    /// `outward_normal` is assumed to have unit length.
    pub fn new(ray: &Ray, t: f32, outward_normal: Vec3, material: MaterialId) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object strictly inside `ray_t`.
    ///
    /// Returns the nearest qualifying intersection, if any.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;
}

/// A list of hittable objects, searched linearly.
#[derive(Default, Clone)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Hittable for HittableList {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;

        for object in &self.objects {
            let closest_so_far = closest.map_or(ray_t.max, |rec| rec.t);
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest = Some(rec);
            }
        }

        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sphere;

    #[test]
    fn test_face_normal_front() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Z, MaterialId::DEFAULT);

        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
        assert_eq!(rec.p, Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_face_normal_back() {
        // Ray travelling along the outward normal: we are inside the surface
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let rec = HitRecord::new(&ray, 1.0, Vec3::Z, MaterialId::DEFAULT);

        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::NEG_Z);
    }

    #[test]
    fn test_empty_list_misses() {
        let list = HittableList::new();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(list.is_empty());
        assert!(list.hit(&ray, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn test_list_returns_nearest() {
        let near = MaterialId::from_index(1);
        let far = MaterialId::from_index(2);

        // Far sphere added first so the list has to narrow the interval
        let mut list = HittableList::new();
        list.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, far)));
        list.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -2.0), 0.5, near)));
        assert_eq!(list.len(), 2);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let rec = list
            .hit(&ray, Interval::new(0.001, f32::INFINITY))
            .expect("ray should hit");

        assert_eq!(rec.material, near);
        assert!((rec.t - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_list_respects_interval() {
        let mut list = HittableList::new();
        list.add(Arc::new(Sphere::new(
            Vec3::new(0.0, 0.0, -5.0),
            1.0,
            MaterialId::DEFAULT,
        )));

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(list.hit(&ray, Interval::new(0.001, 3.0)).is_none());
    }
}

//! Scene assembly.
//!
//! A scene is put together with a [`SceneBuilder`] and then sealed into an
//! immutable [`Scene`]. Only the sealed scene can be hit-tested, so the
//! geometry can never change while a render is reading it.

use std::sync::Arc;

use lumen_math::{Interval, Point3};
use thiserror::Error;

use crate::{HitRecord, Hittable, HittableList, Material, MaterialId, Ray, Sphere};

/// Errors that can occur while assembling a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown material handle: {0}")]
    UnknownMaterial(MaterialId),

    #[error("Unknown material name: {0}")]
    UnknownMaterialName(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// Mutable, single-threaded scene under construction.
pub struct SceneBuilder {
    materials: Vec<Material>,
    objects: HittableList,
}

impl SceneBuilder {
    /// Create an empty builder. Slot 0 holds the absorbing default material.
    pub fn new() -> Self {
        Self {
            materials: vec![Material::Absorb],
            objects: HittableList::new(),
        }
    }

    /// Register a material and return its handle.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId::from_index(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    /// Add a sphere using a previously registered material.
    pub fn add_sphere(
        &mut self,
        center: Point3,
        radius: f32,
        material: MaterialId,
    ) -> SceneResult<()> {
        self.check_material(material)?;
        self.objects.add(Arc::new(Sphere::new(center, radius, material)));
        Ok(())
    }

    /// Add an arbitrary primitive.
    ///
    /// Material handles reported by the primitive are not checked here;
    /// an unknown handle renders with the absorbing default material.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.objects.add(object);
    }

    /// Seal the builder into an immutable scene.
    pub fn build(self) -> Scene {
        log::debug!(
            "Sealed scene: {} objects, {} materials",
            self.objects.len(),
            self.materials.len()
        );
        Scene {
            materials: self.materials,
            world: self.objects,
        }
    }

    fn check_material(&self, material: MaterialId) -> SceneResult<()> {
        if material.index() < self.materials.len() {
            Ok(())
        } else {
            Err(SceneError::UnknownMaterial(material))
        }
    }
}

impl Default for SceneBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An immutable scene, safe to share across render workers.
pub struct Scene {
    materials: Vec<Material>,
    world: HittableList,
}

impl Scene {
    /// Look up a material, falling back to the absorbing default.
    pub fn material(&self, id: MaterialId) -> &Material {
        self.materials
            .get(id.index())
            .unwrap_or(&self.materials[MaterialId::DEFAULT.index()])
    }

    /// Number of top-level objects.
    pub fn len(&self) -> usize {
        self.world.len()
    }

    pub fn is_empty(&self) -> bool {
        self.world.is_empty()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.world.hit(ray, ray_t)
    }
}

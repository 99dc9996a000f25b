//! Scene description files.
//!
//! A scene file is JSON:
//!
//! ```json
//! {
//!   "camera": { "image_width": 400, "samples_per_pixel": 50 },
//!   "render": { "seed": 7 },
//!   "materials": {
//!     "ground": { "type": "lambertian", "albedo": [0.8, 0.8, 0.8] },
//!     "steel":  { "type": "metal", "albedo": [0.1, 0.2, 0.5], "fuzz": 0.5 }
//!   },
//!   "spheres": [
//!     { "center": [0, -100.5, -1], "radius": 100, "material": "ground" },
//!     { "center": [1, 0, -1], "radius": 0.5, "material": "steel" }
//!   ]
//! }
//! ```
//!
//! Every top-level key is optional. A sphere without a material absorbs.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lumen_math::{Point3, Vec3};
use serde::Deserialize;

use crate::{
    CameraConfig, Color, Material, MaterialId, RenderConfig, Scene, SceneBuilder, SceneError,
    SceneResult,
};

/// A material entry in a scene file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MaterialDesc {
    Absorb,
    Lambertian {
        albedo: Color,
    },
    Metal {
        albedo: Color,
        #[serde(default)]
        fuzz: f32,
    },
}

impl MaterialDesc {
    pub fn to_material(&self) -> Material {
        match *self {
            MaterialDesc::Absorb => Material::Absorb,
            MaterialDesc::Lambertian { albedo } => Material::lambertian(albedo),
            MaterialDesc::Metal { albedo, fuzz } => Material::metal(albedo, fuzz),
        }
    }
}

/// A sphere entry in a scene file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SphereDesc {
    pub center: Point3,
    pub radius: f32,
    #[serde(default)]
    pub material: Option<String>,
}

/// Everything needed for one render: camera, scheduling and geometry.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraConfig,
    pub render: RenderConfig,
    pub materials: BTreeMap<String, MaterialDesc>,
    pub spheres: Vec<SphereDesc>,
}

impl SceneDescription {
    /// Parse a description from JSON text.
    pub fn from_json(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a description from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let description = Self::from_json(&text)?;
        log::info!(
            "Loaded scene {}: {} materials, {} spheres",
            path.display(),
            description.materials.len(),
            description.spheres.len()
        );
        Ok(description)
    }

    /// The built-in scene: a large diffuse ground sphere with a polished
    /// and a brushed metal sphere resting on it.
    pub fn default_scene() -> Self {
        let blue = Color::new(0.1, 0.2, 0.5);
        let materials = BTreeMap::from([
            (
                "ground".to_owned(),
                MaterialDesc::Lambertian {
                    albedo: Color::new(0.8, 0.8, 0.8),
                },
            ),
            (
                "polished".to_owned(),
                MaterialDesc::Metal {
                    albedo: blue,
                    fuzz: 0.0,
                },
            ),
            (
                "brushed".to_owned(),
                MaterialDesc::Metal {
                    albedo: blue,
                    fuzz: 0.5,
                },
            ),
        ]);
        let sphere = |center: Vec3, radius: f32, material: &str| SphereDesc {
            center,
            radius,
            material: Some(material.to_owned()),
        };

        Self {
            camera: CameraConfig::default(),
            render: RenderConfig::default(),
            materials,
            spheres: vec![
                sphere(Vec3::new(1.0, 0.0, -1.0), 0.5, "brushed"),
                sphere(Vec3::new(-1.0, 0.0, -1.0), 0.5, "polished"),
                sphere(Vec3::new(0.0, -100.5, -1.0), 100.0, "ground"),
            ],
        }
    }

    /// Register the materials and spheres and seal the scene.
    pub fn build_scene(&self) -> SceneResult<Scene> {
        let mut builder = SceneBuilder::new();

        let ids: HashMap<&str, MaterialId> = self
            .materials
            .iter()
            .map(|(name, desc)| (name.as_str(), builder.add_material(desc.to_material())))
            .collect();

        for sphere in &self.spheres {
            let material = match &sphere.material {
                Some(name) => *ids
                    .get(name.as_str())
                    .ok_or_else(|| SceneError::UnknownMaterialName(name.clone()))?,
                None => MaterialId::DEFAULT,
            };
            builder.add_sphere(sphere.center, sphere.radius, material)?;
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_description() {
        let json = r#"{
            "camera": { "image_width": 64, "aspect_ratio": 2.0, "max_depth": 3 },
            "render": { "seed": 9, "threads": 2 },
            "materials": {
                "matte": { "type": "lambertian", "albedo": [0.5, 0.5, 0.5] },
                "mirror": { "type": "metal", "albedo": [0.9, 0.9, 0.9] },
                "void": { "type": "absorb" }
            },
            "spheres": [
                { "center": [0, 0, -1], "radius": 0.5, "material": "matte" },
                { "center": [0, -100.5, -1], "radius": 100 }
            ]
        }"#;

        let desc = SceneDescription::from_json(json).unwrap();
        assert_eq!(desc.camera.image_width, 64);
        assert_eq!(desc.camera.max_depth, 3);
        // Unspecified fields keep their defaults
        assert_eq!(desc.camera.samples_per_pixel, 50);
        assert_eq!(desc.render.seed, 9);
        assert_eq!(desc.render.threads, Some(2));
        assert_eq!(
            desc.materials["mirror"],
            MaterialDesc::Metal {
                albedo: Color::splat(0.9),
                fuzz: 0.0
            }
        );
        assert_eq!(desc.spheres[1].material, None);

        let scene = desc.build_scene().unwrap();
        assert_eq!(scene.len(), 2);
        // Default absorbing slot plus three named materials
        assert_eq!(scene.material_count(), 4);
    }

    #[test]
    fn test_empty_json_is_empty_scene() {
        let desc = SceneDescription::from_json("{}").unwrap();
        assert_eq!(desc.camera, CameraConfig::default());
        assert!(desc.build_scene().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_material_name_rejected() {
        let json = r#"{ "spheres": [ { "center": [0, 0, 0], "radius": 1, "material": "gold" } ] }"#;
        let desc = SceneDescription::from_json(json).unwrap();
        assert!(matches!(
            desc.build_scene(),
            Err(SceneError::UnknownMaterialName(name)) if name == "gold"
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            SceneDescription::from_json("{ \"spheres\": 3 }"),
            Err(SceneError::Parse(_))
        ));
        assert!(matches!(
            SceneDescription::from_json(r#"{ "materials": { "x": { "type": "glass" } } }"#),
            Err(SceneError::Parse(_))
        ));
    }

    #[test]
    fn test_default_scene_builds() {
        let desc = SceneDescription::default_scene();
        let scene = desc.build_scene().unwrap();
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.material_count(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("lumen_no_such_scene.json");
        assert!(matches!(SceneDescription::load(path), Err(SceneError::Io(_))));
    }
}

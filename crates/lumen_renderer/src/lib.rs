//! Lumen Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer over a flat list of spheres, with diffuse and
//! metal materials, a pinhole camera and a rayon-parallel pixel scheduler.
//!
//! Typical use: describe the scene, seal it, render, save.
//!
//! ```ignore
//! use lumen_renderer::{Camera, LogProgress, SceneDescription, render, output};
//!
//! let desc = SceneDescription::default_scene();
//! let scene = desc.build_scene()?;
//! let camera = Camera::new(&desc.camera)?;
//! let image = render(&scene, &camera, &desc.render, &LogProgress)?;
//! output::save("out.ppm", &image)?;
//! ```

mod camera;
mod description;
mod hittable;
mod material;
mod progress;
mod renderer;
mod sampling;
mod scene;
mod sphere;

pub mod output;

pub use camera::{Camera, CameraConfig};
pub use description::{MaterialDesc, SceneDescription, SphereDesc};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Lambertian, Material, MaterialId, Metal, ScatterResult};
pub use progress::{LogProgress, NoProgress, Progress};
pub use renderer::{
    ray_color, render, render_pixel, sky_gradient, ImageBuffer, RenderConfig, RenderError,
    RenderResult, HIT_EPSILON,
};
pub use scene::{Scene, SceneBuilder, SceneError, SceneResult};
pub use sphere::Sphere;

/// Re-export common math types from lumen_math
pub use lumen_math::{Interval, Point3, Ray, Vec3};

//! Simple path tracer example.
//!
//! Builds a scene in code (no scene file) and saves it as PPM.

use lumen_renderer::{
    output, render, Camera, CameraConfig, Color, LogProgress, Material, RenderConfig,
    SceneBuilder, Vec3,
};
use rand::Rng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut builder = SceneBuilder::new();

    // Ground
    let ground = builder.add_material(Material::lambertian(Color::new(0.5, 0.5, 0.5)));
    builder.add_sphere(Vec3::new(0.0, -1000.5, -1.0), 1000.0, ground)?;

    // A ring of small random spheres around a mirror in the middle
    let mirror = builder.add_material(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0));
    builder.add_sphere(Vec3::new(0.0, 0.0, -1.5), 0.5, mirror)?;

    let mut rng = rand::thread_rng();
    for k in 0..8 {
        let angle = k as f32 * std::f32::consts::TAU / 8.0;
        let center = Vec3::new(1.2 * angle.cos(), -0.35, -1.5 + 1.2 * angle.sin());

        let material = if rng.gen::<f32>() < 0.7 {
            let a = Color::new(rng.gen(), rng.gen(), rng.gen());
            let b = Color::new(rng.gen(), rng.gen(), rng.gen());
            Material::lambertian(a * b)
        } else {
            let albedo = Color::splat(0.5) + 0.5 * Color::new(rng.gen(), rng.gen(), rng.gen());
            Material::metal(albedo, 0.5 * rng.gen::<f32>())
        };
        let id = builder.add_material(material);
        builder.add_sphere(center, 0.15, id)?;
    }

    let scene = builder.build();

    let camera = Camera::new(&CameraConfig {
        image_width: 480,
        samples_per_pixel: 32,
        max_depth: 8,
        ..Default::default()
    })?;

    let image = render(&scene, &camera, &RenderConfig::default(), &LogProgress)?;

    let filename = "simple_render.ppm";
    output::save(filename, &image)?;
    println!("Saved to {}", filename);
    Ok(())
}

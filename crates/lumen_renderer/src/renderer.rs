//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative bounce loop with a configurable depth limit
//! - Anti-aliasing via jittered multi-sampling
//! - Parallel per-pixel scheduling on rayon

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use lumen_math::Interval;
use rand::RngCore;
use rayon::prelude::*;
use serde::Deserialize;
use thiserror::Error;

use crate::sampling::pixel_rng;
use crate::{Camera, Color, Hittable, Progress, Ray, Scene};

/// Rays starting closer than this to a surface ignore it (shadow acne).
pub const HIT_EPSILON: f32 = 1e-4;

/// Errors that can occur when setting up a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Scheduling settings that do not affect the camera geometry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Base seed for every pixel's random generator
    pub seed: u64,
    /// Worker threads; None uses the global rayon pool
    pub threads: Option<usize>,
    /// Report progress every this many finished pixels
    pub progress_interval: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            threads: None,
            progress_interval: 100,
        }
    }
}

/// Outcome of following a ray for one bounce.
enum Bounce {
    /// The surface scattered the ray; keep tracing `next`.
    Scattered { attenuation: Color, next: Ray },
    /// The path ended with this final color factor.
    Terminated(Color),
}

/// Follow a ray for a single bounce.
fn shoot_ray(ray: &Ray, scene: &Scene, rng: &mut dyn RngCore) -> Bounce {
    let Some(rec) = scene.hit(ray, Interval::new(HIT_EPSILON, f32::INFINITY)) else {
        return Bounce::Terminated(sky_gradient(ray));
    };

    match scene.material(rec.material).scatter(ray, &rec, rng) {
        Some(result) => Bounce::Scattered {
            attenuation: result.attenuation,
            next: result.scattered,
        },
        // Fully absorbed
        None => Bounce::Terminated(Color::ZERO),
    }
}

/// Compute the color carried back along a camera ray.
///
/// At most `max_depth` bounces are traced. A path still scattering when the
/// limit is reached keeps the attenuation accumulated so far rather than
/// going to black.
pub fn ray_color(ray: &Ray, scene: &Scene, max_depth: u32, rng: &mut dyn RngCore) -> Color {
    let mut color = Color::ONE;
    let mut ray = *ray;

    for _ in 0..max_depth {
        match shoot_ray(&ray, scene, rng) {
            Bounce::Scattered { attenuation, next } => {
                color *= attenuation;
                ray = next;
            }
            Bounce::Terminated(last) => return color * last,
        }
    }

    color
}

/// Compute sky gradient background.
pub fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Render a single pixel with multi-sampling.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for sample in 0..camera.samples_per_pixel {
        let ray = camera.get_ray(x, y, sample, rng);
        pixel_color += ray_color(&ray, scene, camera.max_depth, rng);
    }

    // Average the samples
    pixel_color * camera.samples_scale()
}

/// Image buffer holding linear colors in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Render the whole image in parallel.
///
/// Every pixel is an independent unit writing only its own slot. Units
/// share a countdown of remaining pixels, guarded by a mutex, which feeds
/// `progress` every `config.progress_interval` pixels.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    progress: &dyn Progress,
) -> RenderResult<ImageBuffer> {
    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);

    log::info!(
        "Rendering {}x{} ({} pixels) @ {} spp, max depth {} ({} objects, {} materials)",
        camera.image_width,
        camera.image_height,
        camera.pixel_count(),
        camera.samples_per_pixel,
        camera.max_depth,
        scene.len(),
        scene.material_count()
    );
    let start = Instant::now();

    match config.threads {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            pool.install(|| render_pixels(&mut image, scene, camera, config, progress));
        }
        None => render_pixels(&mut image, scene, camera, config, progress),
    }

    log::info!("Rendered in {:?}", start.elapsed());
    Ok(image)
}

fn render_pixels(
    image: &mut ImageBuffer,
    scene: &Scene,
    camera: &Camera,
    config: &RenderConfig,
    progress: &dyn Progress,
) {
    let width = image.width as usize;
    let interval = config.progress_interval.max(1);
    let remaining = Mutex::new(camera.pixel_count());

    image
        .pixels
        .par_iter_mut()
        .enumerate()
        .for_each(|(index, pixel)| {
            let x = (index % width) as u32;
            let y = (index / width) as u32;
            let mut rng = pixel_rng(config.seed, index);
            *pixel = render_pixel(camera, scene, x, y, &mut rng);

            let mut left = remaining.lock().unwrap_or_else(PoisonError::into_inner);
            *left -= 1;
            if *left % interval == 0 {
                progress.report(*left);
            }
        });
}

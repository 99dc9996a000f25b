//! Pinhole camera for ray generation.

use crate::sampling::sample_square;
use crate::{Ray, RenderError, RenderResult};
use lumen_math::{Point3, Vec3};
use rand::RngCore;
use serde::Deserialize;

/// Image and viewport settings the camera geometry is derived from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Ratio of image width over height
    pub aspect_ratio: f32,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Random samples taken for each pixel
    pub samples_per_pixel: u32,
    /// Maximum number of bounces per path
    pub max_depth: u32,
    /// Distance from the camera center to the viewport
    pub focal_length: f32,
    /// Viewport height in world units
    pub viewport_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            samples_per_pixel: 50,
            max_depth: 5,
            focal_length: 1.0,
            viewport_height: 2.0,
        }
    }
}

impl CameraConfig {
    /// Image height implied by the width and aspect ratio, at least 1.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f32 / self.aspect_ratio).round() as u32).max(1)
    }

    fn validate(&self) -> RenderResult<()> {
        if self.image_width == 0 {
            return Err(RenderError::InvalidConfig("image_width must be > 0".into()));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be > 0".into(),
            ));
        }
        if self.max_depth == 0 {
            return Err(RenderError::InvalidConfig("max_depth must be >= 1".into()));
        }
        for (name, value) in [
            ("aspect_ratio", self.aspect_ratio),
            ("focal_length", self.focal_length),
            ("viewport_height", self.viewport_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RenderError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Camera with its viewport geometry precomputed.
///
/// Looks down -Z from the origin with +Y up.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,

    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    samples_scale: f32,
}

impl Camera {
    /// Validate the configuration and derive the viewport geometry.
    pub fn new(config: &CameraConfig) -> RenderResult<Self> {
        config.validate()?;

        let image_width = config.image_width;
        let image_height = config.image_height();
        let center = Point3::ZERO;

        // Viewport width follows the real pixel ratio, not the requested one
        let viewport_height = config.viewport_height;
        let viewport_width = viewport_height * (image_width as f32 / image_height as f32);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = Vec3::new(viewport_width, 0.0, 0.0);
        let viewport_v = Vec3::new(0.0, -viewport_height, 0.0);

        let pixel_delta_u = viewport_u / image_width as f32;
        let pixel_delta_v = viewport_v / image_height as f32;

        let viewport_upper_left = center
            - Vec3::new(0.0, 0.0, config.focal_length)
            - viewport_u / 2.0
            - viewport_v / 2.0;
        let pixel00_loc = viewport_upper_left + 0.5 * (pixel_delta_u + pixel_delta_v);

        log::debug!(
            "Camera {}x{}, viewport {:.3}x{:.3}, pixel00 {:?}",
            image_width,
            image_height,
            viewport_width,
            viewport_height,
            pixel00_loc
        );

        Ok(Self {
            image_width,
            image_height,
            samples_per_pixel: config.samples_per_pixel,
            max_depth: config.max_depth,
            center,
            pixel00_loc,
            pixel_delta_u,
            pixel_delta_v,
            samples_scale: 1.0 / config.samples_per_pixel as f32,
        })
    }

    /// Generate the ray for sample `sample_index` of pixel (i, j).
    ///
    /// Sample 0 goes through the exact pixel center; later samples are
    /// jittered uniformly inside the pixel footprint.
    pub fn get_ray(&self, i: u32, j: u32, sample_index: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = if sample_index == 0 {
            Vec3::ZERO
        } else {
            sample_square(rng)
        };

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        Ray::new(self.center, pixel_sample - self.center)
    }

    /// Get the samples scale factor (1 / samples_per_pixel).
    pub fn samples_scale(&self) -> f32 {
        self.samples_scale
    }

    /// Total number of pixels in the image.
    pub fn pixel_count(&self) -> usize {
        self.image_width as usize * self.image_height as usize
    }
}

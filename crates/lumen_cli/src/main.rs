use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_renderer::{output, render, Camera, LogProgress, SceneDescription};

mod logging;

/// Render a scene of spheres with a CPU path tracer.
#[derive(Parser, Debug)]
#[command(name = "lumen", version)]
struct Args {
    /// JSON scene description; the built-in scene is used when omitted
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Output image (.ppm or .png)
    #[arg(short, long, default_value = "output.ppm")]
    output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Width over height
    #[arg(long)]
    aspect_ratio: Option<f32>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum bounces per path
    #[arg(long)]
    max_depth: Option<u32>,

    /// Seed for the per-pixel random generators
    #[arg(long)]
    seed: Option<u64>,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Also write log output to this file (e.g. logs/log.txt)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Command line flags win over the scene file.
    fn apply(&self, desc: &mut SceneDescription) {
        if let Some(width) = self.width {
            desc.camera.image_width = width;
        }
        if let Some(aspect_ratio) = self.aspect_ratio {
            desc.camera.aspect_ratio = aspect_ratio;
        }
        if let Some(samples) = self.samples {
            desc.camera.samples_per_pixel = samples;
        }
        if let Some(max_depth) = self.max_depth {
            desc.camera.max_depth = max_depth;
        }
        if let Some(seed) = self.seed {
            desc.render.seed = seed;
        }
        if self.threads.is_some() {
            desc.render.threads = self.threads;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_file.as_deref()).context("Failed to open log file")?;
    log::info!("Starting Lumen");

    let mut desc = match &args.scene {
        Some(path) => SceneDescription::load(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!("No scene file given, using the built-in scene");
            SceneDescription::default_scene()
        }
    };
    args.apply(&mut desc);

    let scene = desc.build_scene().context("Failed to build scene")?;
    let camera = Camera::new(&desc.camera).context("Invalid camera settings")?;

    let image = render(&scene, &camera, &desc.render, &LogProgress).context("Render failed")?;

    output::save(&args.output, &image)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_scene() {
        let args = Args::parse_from([
            "lumen",
            "--width",
            "64",
            "--samples",
            "3",
            "--max-depth",
            "2",
            "--seed",
            "5",
            "--threads",
            "2",
        ]);
        let mut desc = SceneDescription::default_scene();
        args.apply(&mut desc);

        assert_eq!(desc.camera.image_width, 64);
        assert_eq!(desc.camera.samples_per_pixel, 3);
        assert_eq!(desc.camera.max_depth, 2);
        assert_eq!(desc.render.seed, 5);
        assert_eq!(desc.render.threads, Some(2));
        assert_eq!(args.output, PathBuf::from("output.ppm"));
    }

    #[test]
    fn test_no_flags_keep_scene_values() {
        let args = Args::parse_from(["lumen", "-o", "frame.png"]);
        let mut desc = SceneDescription::default_scene();
        let before = desc.clone();
        args.apply(&mut desc);

        assert_eq!(desc, before);
        assert_eq!(args.output, PathBuf::from("frame.png"));
        assert!(args.scene.is_none());
        assert!(args.log_file.is_none());
    }

    #[test]
    fn test_log_file_flag() {
        let args = Args::parse_from(["lumen", "--log-file", "logs/log.txt"]);
        assert_eq!(args.log_file, Some(PathBuf::from("logs/log.txt")));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}

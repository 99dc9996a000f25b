//! Image encoding.
//!
//! Linear colors are gamma corrected (gamma 2) and quantized to bytes, then
//! written either as plain-text PPM (`P3`) or as PNG.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use lumen_math::Interval;
use thiserror::Error;

use crate::{Color, ImageBuffer};

/// Channel values are clamped into this range before scaling by 256.
const INTENSITY: Interval = Interval::new(0.000, 0.999);

/// Errors that can occur while encoding or decoding images.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("Malformed PPM: {message}")]
    Malformed { message: String },
}

pub type OutputResult<T> = Result<T, OutputError>;

fn malformed(message: impl Into<String>) -> OutputError {
    OutputError::Malformed {
        message: message.into(),
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to an 8-bit RGB triple.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let byte = |c: f32| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [byte(color.x), byte(color.y), byte(color.z)]
}

/// Write an image as plain-text PPM, one pixel per line in row-major order.
pub fn write_ppm<W: Write>(writer: &mut W, image: &ImageBuffer) -> OutputResult<()> {
    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "255")?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb(*color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    writer.flush()?;
    Ok(())
}

/// A decoded plain-text PPM image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpmImage {
    pub width: u32,
    pub height: u32,
    pub max_value: u16,
    /// Pixels in row-major order
    pub pixels: Vec<[u8; 3]>,
}

/// Read a plain-text (`P3`) PPM image with 8-bit channels.
pub fn read_ppm<R: BufRead>(reader: R) -> OutputResult<PpmImage> {
    let mut tokens = Vec::new();
    for line in reader.lines() {
        let line = line?;
        // Everything after '#' is a comment
        let content = line.split('#').next().unwrap_or_default();
        tokens.extend(content.split_whitespace().map(str::to_owned));
    }
    let mut tokens = tokens.into_iter();

    match tokens.next() {
        Some(magic) if magic == "P3" => {}
        Some(magic) => return Err(malformed(format!("expected magic P3, found {magic}"))),
        None => return Err(malformed("empty input")),
    }

    let mut number = |what: &str| -> OutputResult<u32> {
        let token = tokens
            .next()
            .ok_or_else(|| malformed(format!("missing {what}")))?;
        token
            .parse::<u32>()
            .map_err(|_| malformed(format!("invalid {what}: {token}")))
    };

    let width = number("width")?;
    let height = number("height")?;
    let max_value = number("max value")?;
    if max_value == 0 || max_value > 255 {
        return Err(malformed(format!("unsupported max value {max_value}")));
    }

    let count = (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| malformed(format!("image size {width}x{height} overflows")))?;
    // Grown as pixels are read, never sized from the header alone
    let mut pixels = Vec::new();
    for _ in 0..count {
        let mut rgb = [0u8; 3];
        for channel in &mut rgb {
            let value = number("channel value")?;
            if value > max_value {
                return Err(malformed(format!(
                    "channel value {value} exceeds max value {max_value}"
                )));
            }
            *channel = value as u8;
        }
        pixels.push(rgb);
    }

    if tokens.next().is_some() {
        return Err(malformed(format!("more than {count} pixels")));
    }

    Ok(PpmImage {
        width,
        height,
        max_value: max_value as u16,
        pixels,
    })
}

/// Read a PPM file from disk.
pub fn load_ppm(path: impl AsRef<Path>) -> OutputResult<PpmImage> {
    let file = File::open(path)?;
    read_ppm(BufReader::new(file))
}

/// Convert to an `image` RGB buffer.
pub fn to_rgb_image(image: &ImageBuffer) -> image::RgbImage {
    let mut bytes = Vec::with_capacity(image.pixels.len() * 3);
    for color in &image.pixels {
        bytes.extend_from_slice(&color_to_rgb(*color));
    }
    // Length always matches width * height * 3
    image::RgbImage::from_raw(image.width, image.height, bytes)
        .unwrap_or_else(|| image::RgbImage::new(image.width, image.height))
}

/// Save as PNG.
pub fn save_png(path: impl AsRef<Path>, image: &ImageBuffer) -> OutputResult<()> {
    to_rgb_image(image).save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Save as PPM.
pub fn save_ppm(path: impl AsRef<Path>, image: &ImageBuffer) -> OutputResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_ppm(&mut writer, image)
}

/// Save the image, choosing the encoder from the file extension.
pub fn save(path: impl AsRef<Path>, image: &ImageBuffer) -> OutputResult<()> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "ppm" => save_ppm(path, image),
        "png" => save_png(path, image),
        _ => Err(OutputError::UnsupportedFormat(path.display().to_string())),
    }?;

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

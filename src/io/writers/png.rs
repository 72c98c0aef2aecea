use image::{ImageFormat, RgbaImage};
use std::path::Path;

use crate::error::Result;

/// Lossless RGBA output; keeps the transparent background of overlays intact
pub fn write_rgba_png(output: &Path, image: &RgbaImage) -> Result<()> {
    image.save_with_format(output, ImageFormat::Png)?;
    Ok(())
}

use jpeg_encoder::{ColorType, Encoder};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{Error, Result};

/// Baseline JPEG dimensions are limited to 16 bits
fn jpeg_dim(value: usize, arg: &'static str) -> Result<u16> {
    u16::try_from(value).map_err(|_| Error::InvalidArgument {
        arg,
        value: format!("{} exceeds the JPEG limit of {}", value, u16::MAX),
    })
}

pub fn write_rgb_jpeg(output: &Path, cols: usize, rows: usize, rgb_data: &[u8]) -> Result<()> {
    let width = jpeg_dim(cols, "width")?;
    let height = jpeg_dim(rows, "height")?;
    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    let encoder = Encoder::new(&mut writer, 100);
    encoder.encode(rgb_data, width, height, ColorType::Rgb)?;
    Ok(())
}

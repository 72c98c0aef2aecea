use gdal::Dataset;
use gdal::DriverManager;
use gdal::raster::{Buffer, ColorInterpretation};
use image::RgbaImage;
use std::path::Path;

use crate::error::Result;

/// Write the RGB channels of a rasterized figure as a 3-band u8 GeoTIFF.
/// The returned dataset is still open so callers can attach georeferencing.
pub fn write_tiff_rgb(output: &Path, image: &RgbaImage) -> Result<Dataset> {
    let (cols, rows) = (image.width() as usize, image.height() as usize);
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let ds = driver.create_with_band_type::<u8, _>(output, cols, rows, 3)?;

    let interpretations = [
        ColorInterpretation::RedBand,
        ColorInterpretation::GreenBand,
        ColorInterpretation::BlueBand,
    ];
    for (idx, interpretation) in interpretations.into_iter().enumerate() {
        let plane: Vec<u8> = image.pixels().map(|p| p[idx]).collect();
        let mut band = ds.rasterband(idx + 1)?;
        band.set_color_interpretation(interpretation)?;
        let mut buf = Buffer::new((cols, rows), plane);
        band.write((0, 0), (cols, rows), &mut buf)?;
    }
    Ok(ds)
}

use gdal::{Dataset, Metadata, errors::GdalError as GdalCrateError};
use ndarray::Array2;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::types::{BandTriplet, Window};

/// Errors encountered when reading rasters through GDAL
#[derive(Debug, Error)]
pub enum GdalError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Could not open {path}: {source}")]
    Open {
        path: PathBuf,
        source: GdalCrateError,
    },
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Band index {index} out of range (dataset has {bands} bands)")]
    BandOutOfRange { index: usize, bands: usize },
    #[error("Window {window} does not fit a {cols}x{rows} raster")]
    WindowOutOfBounds {
        window: Window,
        cols: usize,
        rows: usize,
    },
    #[error("Dimension mismatch: expected {0}x{1}, got {2} samples")]
    DimensionMismatch(usize, usize, usize),
}

/// Metadata extracted from a GDAL-supported dataset
#[derive(Debug, Clone)]
pub struct RasterMetadata {
    /// Width (pixels) of the raster
    pub cols: usize,
    /// Height (lines) of the raster
    pub rows: usize,
    /// Number of raster bands
    pub bands: usize,
    /// Affine geotransform coefficients, if the dataset is georeferenced
    pub geotransform: Option<[f64; 6]>,
    /// Projection in WKT or `EPSG:XXXX` form; empty when unknown
    pub projection: String,
    /// Additional metadata key-value pairs (default domain)
    pub metadata: HashMap<String, String>,
}

impl RasterMetadata {
    /// Geotransform with its origin moved to the top-left corner of `window`
    pub fn window_geotransform(&self, window: &Window) -> Option<[f64; 6]> {
        self.geotransform.map(|gt| {
            let (x, y) = (window.x as f64, window.y as f64);
            [
                gt[0] + x * gt[1] + y * gt[2],
                gt[1],
                gt[2],
                gt[3] + x * gt[4] + y * gt[5],
                gt[4],
                gt[5],
            ]
        })
    }
}

/// Read-only multispectral raster opened through GDAL (GeoTIFF, ENVI, NetCDF, ...)
pub struct RasterSource {
    path: PathBuf,
    dataset: Dataset,
    metadata: RasterMetadata,
}

// Helper to extract EPSG code from WKT authority tag
fn parse_epsg(wkt: &str) -> Option<String> {
    const KEY: &str = "AUTHORITY[\"EPSG\",\"";
    if let Some(idx) = wkt.rfind(KEY) {
        let start = idx + KEY.len();
        if let Some(end) = wkt[start..].find('"') {
            let code = &wkt[start..start + end];
            return Some(format!("EPSG:{}", code));
        }
    }
    None
}

fn is_identity(gt: &[f64; 6]) -> bool {
    *gt == [0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
}

impl RasterSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GdalError> {
        let path = path.as_ref().to_path_buf();
        let dataset = Dataset::open(&path).map_err(|source| GdalError::Open {
            path: path.clone(),
            source,
        })?;
        let (cols, rows) = dataset.raster_size();
        let bands = dataset.raster_count() as usize;
        if bands == 0 {
            return Err(GdalError::UnsupportedFormat("No raster bands found".into()));
        }
        let geotransform = dataset.geo_transform().ok().filter(|gt| !is_identity(gt));
        let proj = dataset.projection();
        let projection = if proj.starts_with("EPSG:") {
            proj
        } else if let Some(code) = parse_epsg(&proj) {
            code
        } else {
            proj
        };
        let mut metadata_map = HashMap::new();
        if let Some(entries) = dataset.metadata_domain("") {
            for entry in entries {
                if let Some((key, val)) = entry.split_once('=') {
                    metadata_map.insert(key.to_string(), val.to_string());
                }
            }
        }
        debug!(
            "Opened {:?}: {}x{} pixels, {} bands, projection='{}'",
            path, cols, rows, bands, projection
        );
        Ok(RasterSource {
            path,
            dataset,
            metadata: RasterMetadata {
                cols: cols as usize,
                rows: rows as usize,
                bands,
                geotransform,
                projection,
                metadata: metadata_map,
            },
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata(&self) -> &RasterMetadata {
        &self.metadata
    }

    pub fn full_window(&self) -> Window {
        Window::full(self.metadata.cols, self.metadata.rows)
    }

    /// Read a window of one band (1-based index) as an f64 array of shape
    /// (height, width). Non-finite samples are replaced with zero.
    pub fn read_window(&self, index: usize, window: &Window) -> Result<Array2<f64>, GdalError> {
        if index == 0 || index > self.metadata.bands {
            return Err(GdalError::BandOutOfRange {
                index,
                bands: self.metadata.bands,
            });
        }
        if !window.fits(self.metadata.cols, self.metadata.rows) {
            return Err(GdalError::WindowOutOfBounds {
                window: *window,
                cols: self.metadata.cols,
                rows: self.metadata.rows,
            });
        }
        let band = self.dataset.rasterband(index)?;
        let size = (window.width, window.height);
        let buf = band.read_as::<f64>(
            (window.x as isize, window.y as isize), // offset
            size,                                   // window size
            size,                                   // shape
            None,                                   // no resampling
        )?;
        let data_vec: Vec<f64> = buf
            .data()
            .iter()
            .map(|&v| if v.is_finite() { v } else { 0.0 })
            .collect();
        let len = data_vec.len();
        Array2::from_shape_vec((window.height, window.width), data_vec)
            .map_err(|_| GdalError::DimensionMismatch(window.width, window.height, len))
    }

    /// Read the red, green and blue bands of a triplet over the same window
    pub fn read_triplet(
        &self,
        bands: &BandTriplet,
        window: &Window,
    ) -> Result<[Array2<f64>; 3], GdalError> {
        Ok([
            self.read_window(bands.red, window)?,
            self.read_window(bands.green, window)?,
            self.read_window(bands.blue, window)?,
        ])
    }
}

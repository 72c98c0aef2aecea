//! I/O layer: GDAL-backed raster sources and `writers` for PNG/JPEG/GeoTIFF
//! figures with world files, embedded georeferencing and JSON sidecars.
pub mod gdal;
pub use self::gdal::{GdalError, RasterMetadata, RasterSource};

pub mod writers;

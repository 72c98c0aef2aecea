//! Output encoders for rasterized figures plus georeferencing and provenance files.
pub mod jpeg;
pub mod metadata;
pub mod png;
pub mod tiff;
pub mod worldfile;

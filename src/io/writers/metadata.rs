use gdal::Dataset;
use gdal::Metadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::render::FigureDescription;
use crate::types::{BandTriplet, Enhancement, Window};

pub const CONVERSION_TOOL: &str = "mscomposite";

/// Geotransform and projection of a rendered single-panel figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Georeference {
    pub geotransform: [f64; 6],
    /// WKT or `EPSG:XXXX`; empty when the source has no projection
    pub projection: String,
}

/// What was read from one input raster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub path: PathBuf,
    pub bands: BandTriplet,
    pub window: Window,
    pub enhancement: Enhancement,
    pub classification: bool,
}

/// JSON sidecar written next to every saved figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSidecar {
    pub conversion_tool: String,
    pub conversion_version: String,
    pub conversion_timestamp: String,
    pub sources: Vec<SourceInfo>,
    pub figure: FigureDescription,
    #[serde(default)]
    pub georeference: Option<Georeference>,
}

impl FigureSidecar {
    pub fn new(
        figure: FigureDescription,
        sources: Vec<SourceInfo>,
        georeference: Option<Georeference>,
    ) -> Self {
        Self {
            conversion_tool: CONVERSION_TOOL.to_string(),
            conversion_version: env!("CARGO_PKG_VERSION").to_string(),
            conversion_timestamp: chrono::Utc::now().to_rfc3339(),
            sources,
            figure,
            georeference,
        }
    }
}

/// Flatten provenance, sources, titles and legend labels into GDAL metadata items
pub fn extract_metadata_fields(sidecar: &FigureSidecar) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();
    metadata.insert("CONVERSION_TOOL".to_string(), sidecar.conversion_tool.clone());
    metadata.insert(
        "CONVERSION_VERSION".to_string(),
        sidecar.conversion_version.clone(),
    );
    metadata.insert(
        "CONVERSION_TIMESTAMP".to_string(),
        sidecar.conversion_timestamp.clone(),
    );

    for (i, source) in sidecar.sources.iter().enumerate() {
        let n = i + 1;
        metadata.insert(format!("SOURCE_{}", n), source.path.display().to_string());
        metadata.insert(format!("SOURCE_{}_BANDS", n), source.bands.to_string());
        metadata.insert(format!("SOURCE_{}_WINDOW", n), source.window.to_string());
        metadata.insert(
            format!("SOURCE_{}_ENHANCEMENT", n),
            source.enhancement.to_string(),
        );
        if source.classification {
            metadata.insert(format!("SOURCE_{}_CLASSIFICATION", n), "YES".to_string());
        }
    }

    for (i, panel) in sidecar.figure.panels.iter().enumerate() {
        let n = i + 1;
        metadata.insert(format!("PANEL_{}_TITLE", n), panel.title.clone());
        if let Some(colorbar) = &panel.colorbar {
            let labels: Vec<&str> = colorbar.ticks.iter().map(|t| t.label.as_str()).collect();
            metadata.insert(format!("PANEL_{}_LEGEND", n), labels.join(","));
        }
    }
    metadata
}

/// Write `<output>.json` describing the figure
pub fn write_sidecar(output_path: &Path, sidecar: &FigureSidecar) -> Result<PathBuf> {
    let sidecar_path = output_path.with_extension("json");
    let json_string = serde_json::to_string_pretty(sidecar)?;
    std::fs::write(&sidecar_path, json_string)?;
    info!("Created metadata sidecar: {:?}", sidecar_path);
    Ok(sidecar_path)
}

/// Embed georeferencing and descriptive metadata into a GeoTIFF dataset
pub fn embed_tiff_metadata(ds: &mut Dataset, sidecar: &FigureSidecar) -> Result<()> {
    if let Some(georef) = &sidecar.georeference {
        ds.set_geo_transform(&georef.geotransform)?;
        if !georef.projection.is_empty() {
            ds.set_projection(&georef.projection)?;
        }
    }
    for (key, value) in extract_metadata_fields(sidecar) {
        ds.set_metadata_item(&key, &value, "")?;
    }
    Ok(())
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{BandTriplet, Enhancement, Window};

/// How one raster is turned into a composite. Unset fields fall back to the
/// defaults: bands `[1,1,1]`, the full raster, logarithmic 2% stretch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageSpec {
    pub path: PathBuf,
    #[serde(default)]
    pub bands: Option<BandTriplet>,
    #[serde(default)]
    pub window: Option<Window>,
    #[serde(default)]
    pub enhancement: Option<Enhancement>,
    /// Show band 1 as a classification map instead of an RGB composite
    #[serde(default)]
    pub classification: bool,
}

impl ImageSpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn enhancement_or_default(&self) -> Enhancement {
        self.enhancement.unwrap_or_default()
    }
}

/// Display parameters suitable for JSON presets and the CLI
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayParams {
    pub primary: ImageSpec,
    /// Second image shown side by side, or underneath the primary when `opacity` is set
    #[serde(default)]
    pub secondary: Option<ImageSpec>,
    /// Overlay the primary image onto the secondary with this opacity (0..=1)
    #[serde(default)]
    pub opacity: Option<f64>,
    /// Class labels for the legend of a classification image
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    /// Save the rendered figure to this path
    #[serde(default)]
    pub save: Option<PathBuf>,
}

impl DisplayParams {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StretchPolicy;

    #[test]
    fn preset_fills_missing_fields_with_none() {
        let json = r#"{ "primary": { "path": "scene.tif", "bands": { "red": 4, "green": 3, "blue": 2 } } }"#;
        let params: DisplayParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.primary.path, PathBuf::from("scene.tif"));
        assert_eq!(params.primary.bands, Some(BandTriplet::new(4, 3, 2)));
        assert_eq!(params.primary.window, None);
        assert!(!params.primary.classification);
        assert!(params.secondary.is_none());
        assert_eq!(
            params.primary.enhancement_or_default(),
            Enhancement::Named(StretchPolicy::Logarithmic2Pc)
        );
    }

    #[test]
    fn preset_accepts_tagged_enhancements() {
        let json = r#"{
            "primary": { "path": "a.tif", "enhancement": { "ExplicitRange": { "lo": 0.0, "hi": 3000.0 } } },
            "secondary": { "path": "b.tif", "enhancement": { "Named": "Equalization" }, "classification": true },
            "opacity": 0.4
        }"#;
        let params: DisplayParams = serde_json::from_str(json).unwrap();
        assert_eq!(
            params.primary.enhancement,
            Some(Enhancement::ExplicitRange { lo: 0.0, hi: 3000.0 })
        );
        let secondary = params.secondary.unwrap();
        assert_eq!(
            secondary.enhancement,
            Some(Enhancement::Named(StretchPolicy::Equalization))
        );
        assert!(secondary.classification);
        assert_eq!(params.opacity, Some(0.4));
    }
}

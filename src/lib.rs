#![doc = r#"
mscomposite: contrast-stretched RGB composites of multispectral rasters.

This crate reads three bands of any GDAL-supported raster (GeoTIFF, ENVI,
NetCDF, ...), stretches each band onto the display range with one of seven
enhancement policies, and stacks them into an RGB composite. Categorical
rasters can be shown as classification maps with a class legend, side by side
with another image or blended over it. Figures are shown in a native window
(`gui` feature) or saved as PNG, JPEG or GeoTIFF with a JSON sidecar.

Requirements
------------
- GDAL development headers and runtime available on your system.
- Rust 2024 edition toolchain.

Add dependency
--------------
```toml
[dependencies]
mscomposite = { version = "0.1", default-features = false }
```

Quick start: save a false-color composite
-----------------------------------------
```rust,no_run
use std::path::Path;
use mscomposite::{
    build_figure, save_figure, BandTriplet, DisplayParams, Enhancement, ImageSpec, StretchPolicy,
};

fn main() -> mscomposite::Result<()> {
    let mut primary = ImageSpec::new("/data/scene.tif");
    primary.bands = Some(BandTriplet::new(4, 3, 2));
    primary.enhancement = Some(Enhancement::Named(StretchPolicy::Linear2Pc));

    let params = DisplayParams { primary, ..Default::default() };
    let rendered = build_figure(&params)?;
    save_figure(&rendered, Path::new("/out/scene.png"))
}
```

Classification overlay
----------------------
```rust,no_run
use mscomposite::{build_figure, DisplayParams, ImageSpec};

fn main() -> mscomposite::Result<()> {
    let mut classes = ImageSpec::new("/data/classes.tif");
    classes.classification = true;

    let params = DisplayParams {
        primary: classes,
        secondary: Some(ImageSpec::new("/data/scene.tif")),
        opacity: Some(0.4),
        labels: Some(vec!["water".into(), "forest".into(), "urban".into()]),
        save: None,
    };
    let rendered = build_figure(&params)?;
    for panel in rendered.figure.describe().panels {
        println!("{}", panel.title);
    }
    Ok(())
}
```

Working with arrays
-------------------
```rust
use ndarray::Array2;
use mscomposite::{make_composite, Enhancement, StretchPolicy};

let band = Array2::from_shape_fn((4, 4), |(r, c)| (r * 4 + c) as f64);
let rgb = make_composite(
    band.view(),
    band.view(),
    band.view(),
    Enhancement::Named(StretchPolicy::Linear),
)
.unwrap();
assert_eq!(rgb.pixel(3, 3), [1.0, 1.0, 1.0]);
```

Error handling
--------------
All public functions return `mscomposite::Result<T>`; match on `mscomposite::Error` to
handle specific cases, e.g. GDAL errors for missing bands or windows outside the raster.

Feature flags
-------------
- `gui` (default): native figure viewer with a "Save as…" dialog.
- `full`: enables a complete feature set.

Useful modules
--------------
- [`api`]: load, lay out, save and display figures.
- [`core`]: stretch functions, band assembly, classification legends, presets.
- [`render`]: color maps and figure rasterization.
- [`io`]: GDAL raster source and output writers.
- [`types`]: enhancement policies, band triplets, windows.
- [`error`]: crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod render;
pub mod types;

// GUI module (only available with gui feature)
#[cfg(feature = "gui")]
pub mod gui;

// Curated public API surface
// Types
pub use crate::core::params::{DisplayParams, ImageSpec};
pub use error::{Error, Result};
pub use types::{BandTriplet, Enhancement, OutputFormat, ParseError, StretchPolicy, Window};

// Processing
pub use crate::core::processing::classes::{ClassImage, LegendTick, class_legend, make_class_image};
pub use crate::core::processing::composite::{RgbComposite, make_composite};
pub use crate::core::processing::stretch::stretch;

// Readers
pub use io::gdal::{GdalError, RasterMetadata, RasterSource};

// Selected writer helpers
pub use io::writers::metadata::{FigureSidecar, Georeference, SourceInfo};

// High-level API re-exports
#[cfg(feature = "gui")]
pub use api::display;
pub use api::{
    ImageContent, LoadedImage, RenderedFigure, build_figure, load_image, save_figure,
};

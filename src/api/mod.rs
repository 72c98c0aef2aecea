//! High-level library API: load rasters into composites, lay them out as a
//! figure, save the figure to disk or show it in a window. The CLI and GUI are
//! thin layers over these entrypoints.
use std::path::Path;

use tracing::{debug, info, warn};

use crate::core::params::{DisplayParams, ImageSpec};
use crate::core::processing::classes::{ClassImage, class_legend, make_class_image};
use crate::core::processing::composite::{RgbComposite, make_composite};
use crate::error::{Error, Result};
use crate::io::RasterSource;
use crate::io::writers::jpeg::write_rgb_jpeg;
use crate::io::writers::metadata::{
    FigureSidecar, Georeference, SourceInfo, embed_tiff_metadata, write_sidecar,
};
use crate::io::writers::png::write_rgba_png;
use crate::io::writers::tiff::write_tiff_rgb;
use crate::io::writers::worldfile::{write_prj_file, write_world_file};
use crate::render::colormap::{ColorMap, Norm};
use crate::render::figure::{
    Colorbar, Figure, Panel, blend_over, paint_classes, paint_rgb, panel_title, CLASS_OFFSET,
};
use crate::types::{BandTriplet, Enhancement, OutputFormat, StretchPolicy};

/// Pixels of a loaded image: an RGB composite or a classification map
#[derive(Debug, Clone)]
pub enum ImageContent {
    Rgb(RgbComposite),
    Classes(ClassImage),
}

impl ImageContent {
    pub fn composite(&self) -> &RgbComposite {
        match self {
            ImageContent::Rgb(composite) => composite,
            ImageContent::Classes(classes) => &classes.composite,
        }
    }
}

/// One raster read, stretched and titled
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub source: SourceInfo,
    pub title: String,
    pub content: ImageContent,
    pub georeference: Option<Georeference>,
}

/// A laid-out figure together with what is needed to save it
#[derive(Debug, Clone)]
pub struct RenderedFigure {
    pub figure: Figure,
    pub sources: Vec<SourceInfo>,
    /// Present for single-panel figures over a georeferenced source
    pub georeference: Option<Georeference>,
}

impl RenderedFigure {
    pub fn sidecar(&self) -> FigureSidecar {
        FigureSidecar::new(
            self.figure.describe(),
            self.sources.clone(),
            self.georeference.clone(),
        )
    }
}

/// Read one image described by `spec`.
///
/// Band indices above the band count are clamped to the last band; a missing
/// triplet falls back to `fallback_bands`, then to `[1, 1, 1]`. Classification
/// images always read band 1 and use a linear stretch. `shorten_title` applies
/// the long file name rule used for single-image figures.
pub fn load_image(
    spec: &ImageSpec,
    fallback_bands: Option<BandTriplet>,
    shorten_title: bool,
) -> Result<LoadedImage> {
    let source = RasterSource::open(&spec.path)?;
    let meta = source.metadata();
    let window = spec.window.unwrap_or_else(|| source.full_window());
    let bands = spec
        .bands
        .or(fallback_bands)
        .unwrap_or_default()
        .clamped(meta.bands);

    let (content, enhancement) = if spec.classification {
        let band = source.read_window(1, &window)?;
        let classes = make_class_image(band.view());
        let enhancement = Enhancement::Named(StretchPolicy::Linear);
        (ImageContent::Classes(classes), enhancement)
    } else {
        let enhancement = spec.enhancement_or_default();
        let [red, green, blue] = source.read_triplet(&bands, &window)?;
        let composite = make_composite(red.view(), green.view(), blue.view(), enhancement)?;
        (ImageContent::Rgb(composite), enhancement)
    };

    let georeference = meta
        .window_geotransform(&window)
        .map(|geotransform| Georeference {
            geotransform,
            projection: meta.projection.clone(),
        });
    let file_name = spec
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| spec.path.display().to_string());
    let title = panel_title(&file_name, enhancement, &bands, &window, shorten_title);
    info!("Loaded {}", title);

    Ok(LoadedImage {
        source: SourceInfo {
            path: spec.path.clone(),
            bands,
            window,
            enhancement,
            classification: spec.classification,
        },
        title,
        content,
        georeference,
    })
}

fn legend(classes: &ClassImage, labels: Option<&[String]>) -> Result<Colorbar> {
    Ok(Colorbar {
        colormap: ColorMap::jet(),
        ticks: class_legend(classes.num_classes, labels)?,
    })
}

fn paint_panel(image: &LoadedImage, norm: Norm) -> Panel {
    let canvas = match &image.content {
        ImageContent::Rgb(composite) => paint_rgb(composite, 0.0),
        ImageContent::Classes(classes) => {
            paint_classes(&classes.composite, &ColorMap::jet(), norm, false)
        }
    };
    Panel::new(image.title.clone(), canvas)
}

/// Load the images named in `params` and lay them out.
///
/// - one image: a single panel, with a class legend for classification images
/// - two images: side by side, primary on the left
/// - two images with `opacity`: the primary drawn over the secondary
pub fn build_figure(params: &DisplayParams) -> Result<RenderedFigure> {
    let labels = params.labels.as_deref();
    if labels.is_some() && !params.primary.classification {
        warn!("Class labels given without a classification image; ignoring them");
    }

    let Some(secondary_spec) = &params.secondary else {
        if params.opacity.is_some() {
            warn!("Opacity given without a second image; ignoring it");
        }
        let primary = load_image(&params.primary, None, true)?;
        let mut panel = paint_panel(&primary, Norm::UNIT);
        if let ImageContent::Classes(classes) = &primary.content {
            panel = panel.with_colorbar(legend(classes, labels)?);
        }
        return Ok(RenderedFigure {
            figure: Figure::new(vec![panel]),
            georeference: primary.georeference.clone(),
            sources: vec![primary.source],
        });
    };

    if let Some(opacity) = params.opacity {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(Error::InvalidArgument {
                arg: "opacity",
                value: opacity.to_string(),
            });
        }
    }

    let primary = load_image(&params.primary, None, false)?;
    let secondary = load_image(secondary_spec, Some(primary.source.bands), false)?;

    match params.opacity {
        Some(opacity) => {
            debug!("Overlaying {} onto {} at opacity {}", primary.title, secondary.title, opacity);
            let mut canvas = paint_rgb(secondary.content.composite(), 0.0);
            let mut colorbar = None;
            let top = match &primary.content {
                ImageContent::Rgb(composite) => paint_rgb(composite, CLASS_OFFSET),
                ImageContent::Classes(classes) => {
                    colorbar = Some(legend(classes, labels)?);
                    paint_classes(&classes.composite, &ColorMap::jet(), Norm::UNIT, true)
                }
            };
            if top.dimensions() != canvas.dimensions() {
                warn!(
                    "Overlay is {:?} pixels but the background is {:?}; blending the overlap only",
                    top.dimensions(),
                    canvas.dimensions()
                );
            }
            blend_over(&mut canvas, &top, opacity);
            let mut panel = Panel::new(primary.title.clone(), canvas);
            if let Some(colorbar) = colorbar {
                panel = panel.with_colorbar(colorbar);
            }
            Ok(RenderedFigure {
                figure: Figure::new(vec![panel]),
                georeference: secondary.georeference.clone(),
                sources: vec![primary.source, secondary.source],
            })
        }
        None => {
            let left = paint_panel(&primary, Norm::UNIT);
            let right = paint_panel(&secondary, Norm::new(CLASS_OFFSET, 1.0));
            Ok(RenderedFigure {
                figure: Figure::new(vec![left, right]),
                georeference: None,
                sources: vec![primary.source, secondary.source],
            })
        }
    }
}

/// Save a figure; the format follows the file extension (png, jpg/jpeg, tif/tiff).
/// A `<name>.json` sidecar is always written. Georeferenced figures also get a
/// world file and `.prj` (PNG/JPEG) or embedded georeferencing (GeoTIFF).
pub fn save_figure(rendered: &RenderedFigure, output: &Path) -> Result<()> {
    let format = OutputFormat::from_path(output).ok_or_else(|| Error::InvalidArgument {
        arg: "save",
        value: format!("{} (expected .png, .jpg, .jpeg, .tif or .tiff)", output.display()),
    })?;
    let raster = rendered.figure.rasterize();
    let sidecar = rendered.sidecar();

    match format {
        OutputFormat::PNG | OutputFormat::JPEG => {
            if format == OutputFormat::PNG {
                write_rgba_png(output, &raster)?;
            } else {
                let rgb: Vec<u8> = raster.pixels().flat_map(|p| [p[0], p[1], p[2]]).collect();
                write_rgb_jpeg(output, raster.width() as usize, raster.height() as usize, &rgb)?;
            }
            if let Some(georef) = &rendered.georeference {
                write_world_file(output, georef.geotransform)?;
                if !georef.projection.is_empty() {
                    write_prj_file(output, &georef.projection)?;
                }
            }
        }
        OutputFormat::TIFF => {
            let mut ds = write_tiff_rgb(output, &raster)?;
            embed_tiff_metadata(&mut ds, &sidecar)?;
        }
    }
    write_sidecar(output, &sidecar)?;
    info!(
        "Saved {}x{} figure to {:?}",
        raster.width(),
        raster.height(),
        output
    );
    Ok(())
}

/// Show the figure in a window until it is closed
#[cfg(feature = "gui")]
pub fn display(rendered: &RenderedFigure) -> Result<()> {
    crate::gui::show(rendered.clone())
}

use std::path::{Path, PathBuf};

use gdal::raster::Buffer;
use gdal::{Dataset, DriverManager};
use tempfile::TempDir;

use mscomposite::{
    BandTriplet, DisplayParams, Enhancement, Error, GdalError, ImageContent, ImageSpec,
    StretchPolicy, Window, build_figure, load_image, save_figure,
};

const GEOTRANSFORM: [f64; 6] = [1000.0, 10.0, 0.0, 2000.0, 0.0, -10.0];

fn write_raster(
    path: &Path,
    cols: usize,
    rows: usize,
    bands: &[Vec<f64>],
    geotransform: Option<[f64; 6]>,
) {
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut ds = driver
        .create_with_band_type::<f64, _>(path, cols, rows, bands.len())
        .unwrap();
    if let Some(gt) = geotransform {
        ds.set_geo_transform(&gt).unwrap();
    }
    for (i, data) in bands.iter().enumerate() {
        let mut band = ds.rasterband(i + 1).unwrap();
        let mut buf = Buffer::new((cols, rows), data.clone());
        band.write((0, 0), (cols, rows), &mut buf).unwrap();
    }
}

fn ramp_4x4(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    let data: Vec<f64> = (0..16).map(|v| v as f64).collect();
    write_raster(&path, 4, 4, &[data], Some(GEOTRANSFORM));
    path
}

fn classes_4x4(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("classes.tif");
    let data: Vec<f64> = (0..16).map(|v| (v % 4) as f64).collect();
    write_raster(&path, 4, 4, &[data], None);
    path
}

fn linear(path: &Path) -> ImageSpec {
    let mut spec = ImageSpec::new(path);
    spec.enhancement = Some(Enhancement::Named(StretchPolicy::Linear));
    spec
}

#[test]
fn ramp_band_renders_as_linear_grayscale() {
    let dir = tempfile::tempdir().unwrap();
    let path = ramp_4x4(&dir, "ramp.tif");

    let image = load_image(&linear(&path), None, true).unwrap();
    let ImageContent::Rgb(composite) = &image.content else {
        panic!("expected an RGB composite");
    };
    assert_eq!(composite.dim(), (4, 4));
    for ((r, c, _), &v) in composite.data().indexed_iter() {
        let expected = ((r * 4 + c) as f64 * 255.0 / 15.0).trunc() / 255.0;
        assert!((v - expected).abs() < 1e-12, "pixel ({r}, {c})");
    }
    assert_eq!(image.source.bands, BandTriplet::new(1, 1, 1));
    assert_eq!(image.source.window, Window::new(0, 0, 4, 4));
    assert_eq!(image.title, "ramp.tif: linear: [1, 1, 1]: [0, 0, 4, 4]");
    assert_eq!(
        image.georeference.as_ref().map(|g| g.geotransform),
        Some(GEOTRANSFORM)
    );
}

#[test]
fn band_indices_are_clamped_and_nan_reads_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("two_bands.tif");
    let mut first: Vec<f64> = (0..16).map(|v| v as f64 + 1.0).collect();
    first[0] = f64::NAN;
    let second: Vec<f64> = (0..16).map(|v| 100.0 - v as f64).collect();
    write_raster(&path, 4, 4, &[first, second], None);

    let mut spec = linear(&path);
    spec.bands = Some(BandTriplet::new(5, 2, 1));
    let image = load_image(&spec, None, true).unwrap();
    assert_eq!(image.source.bands, BandTriplet::new(2, 2, 1));
    assert!(image.georeference.is_none());

    let composite = image.content.composite();
    // NaN became 0, the band minimum
    assert_eq!(composite.pixel(0, 0)[2], 0.0);
    assert_eq!(composite.pixel(3, 3)[2], 1.0);
    assert_eq!(composite.pixel(0, 0)[0], 1.0);
}

#[test]
fn classification_image_has_one_tick_per_class() {
    let dir = tempfile::tempdir().unwrap();
    let mut spec = ImageSpec::new(classes_4x4(&dir));
    spec.classification = true;
    let params = DisplayParams {
        primary: spec.clone(),
        ..Default::default()
    };

    let rendered = build_figure(&params).unwrap();
    let description = rendered.figure.describe();
    assert_eq!(description.panels.len(), 1);
    let colorbar = description.panels[0].colorbar.as_ref().unwrap();
    let labels: Vec<&str> = colorbar.ticks.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["0", "1", "2", "3"]);
    assert!(description.panels[0].title.contains(": linear: "));

    let custom = DisplayParams {
        primary: spec.clone(),
        labels: Some(vec!["water".into(), "forest".into(), "urban".into(), "bare".into()]),
        ..Default::default()
    };
    let rendered = build_figure(&custom).unwrap();
    let description = rendered.figure.describe();
    let ticks = &description.panels[0].colorbar.as_ref().unwrap().ticks;
    assert_eq!(ticks[3].label, "bare");

    let wrong = DisplayParams {
        primary: spec,
        labels: Some(vec!["water".into(), "forest".into()]),
        ..Default::default()
    };
    assert!(matches!(
        build_figure(&wrong),
        Err(Error::InvalidArgument { arg: "labels", .. })
    ));
}

#[test]
fn two_images_side_by_side_and_overlaid() {
    let dir = tempfile::tempdir().unwrap();
    let left = ramp_4x4(&dir, "left.tif");
    let right = ramp_4x4(&dir, "right.tif");

    let mut primary = linear(&left);
    primary.bands = Some(BandTriplet::new(1, 1, 1));
    let mut params = DisplayParams {
        primary,
        secondary: Some(linear(&right)),
        ..Default::default()
    };
    let rendered = build_figure(&params).unwrap();
    assert_eq!(rendered.figure.panels().len(), 2);
    assert_eq!(rendered.sources.len(), 2);
    assert_eq!(rendered.sources[1].bands, BandTriplet::new(1, 1, 1));
    assert!(rendered.georeference.is_none());

    params.opacity = Some(0.5);
    let rendered = build_figure(&params).unwrap();
    assert_eq!(rendered.figure.panels().len(), 1);
    assert_eq!(rendered.figure.size(), (4, 4));
    assert_eq!(
        rendered.georeference.as_ref().map(|g| g.geotransform),
        Some(GEOTRANSFORM)
    );

    params.opacity = Some(1.5);
    assert!(matches!(
        build_figure(&params),
        Err(Error::InvalidArgument { arg: "opacity", .. })
    ));
}

#[test]
fn png_output_gets_world_file_and_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    let mut spec = linear(&ramp_4x4(&dir, "scene.tif"));
    spec.window = Some(Window::new(1, 1, 2, 3));
    let rendered = build_figure(&DisplayParams {
        primary: spec,
        ..Default::default()
    })
    .unwrap();

    let out = dir.path().join("figure.png");
    save_figure(&rendered, &out).unwrap();

    let png = image::open(&out).unwrap();
    assert_eq!((png.width(), png.height()), (2, 3));

    let world = std::fs::read_to_string(dir.path().join("figure.pgw")).unwrap();
    let values: Vec<f64> = world.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(values, [10.0, 0.0, 0.0, -10.0, 1015.0, 1985.0]);
    // no projection on the source
    assert!(!dir.path().join("figure.prj").exists());

    let sidecar: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("figure.json")).unwrap())
            .unwrap();
    assert_eq!(sidecar["conversion_tool"], "mscomposite");
    assert_eq!(sidecar["figure"]["width"], 2);
    assert_eq!(
        sidecar["figure"]["panels"][0]["title"],
        "scene.tif: linear: [1, 1, 1]: [1, 1, 2, 3]"
    );
}

#[test]
fn jpeg_and_geotiff_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let mut spec = linear(&ramp_4x4(&dir, "scene.tif"));
    spec.window = Some(Window::new(1, 1, 2, 2));
    let rendered = build_figure(&DisplayParams {
        primary: spec,
        ..Default::default()
    })
    .unwrap();

    let jpg = dir.path().join("figure.jpg");
    save_figure(&rendered, &jpg).unwrap();
    assert!(dir.path().join("figure.jgw").exists());
    assert!(dir.path().join("figure.json").exists());

    let tif = dir.path().join("figure_rgb.tif");
    save_figure(&rendered, &tif).unwrap();
    let ds = Dataset::open(&tif).unwrap();
    assert_eq!(ds.raster_count(), 3);
    assert_eq!(ds.raster_size(), (2, 2));
    assert_eq!(
        ds.geo_transform().unwrap(),
        [1010.0, 10.0, 0.0, 1990.0, 0.0, -10.0]
    );
    assert!(dir.path().join("figure_rgb.json").exists());

    let err = save_figure(&rendered, &dir.path().join("figure.bmp")).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "save", .. }));
}

#[test]
fn load_errors_are_typed() {
    let dir = tempfile::tempdir().unwrap();
    let path = ramp_4x4(&dir, "scene.tif");

    let mut bad_band = linear(&path);
    bad_band.bands = Some(BandTriplet::new(0, 1, 1));
    assert!(matches!(
        load_image(&bad_band, None, true),
        Err(Error::Gdal(GdalError::BandOutOfRange { index: 0, .. }))
    ));

    let mut bad_window = linear(&path);
    bad_window.window = Some(Window::new(2, 2, 4, 4));
    assert!(matches!(
        load_image(&bad_window, None, true),
        Err(Error::Gdal(GdalError::WindowOutOfBounds { .. }))
    ));

    let missing = linear(&dir.path().join("missing.tif"));
    assert!(matches!(
        load_image(&missing, None, true),
        Err(Error::Gdal(GdalError::Open { .. }))
    ));
}

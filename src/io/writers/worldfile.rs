use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// World file path for an image: `.pgw`, `.jgw`, `.tfw`, otherwise the first
/// letter of the extension followed by `w`, or `.wld` without an extension.
pub fn world_file_path(output_image: &Path) -> PathBuf {
    let ext = output_image
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let world_ext = match ext.as_str() {
        "jpg" | "jpeg" => "jgw".to_string(),
        "png" => "pgw".to_string(),
        "tif" | "tiff" => "tfw".to_string(),
        other => match other.chars().next() {
            Some(first) => format!("{}w", first),
            None => "wld".to_string(),
        },
    };
    output_image.with_extension(world_ext)
}

/// Write a world file next to the raster image using the provided geotransform.
/// The world file stores the transform in pixel-center convention.
pub fn write_world_file(output_image: &Path, geotransform: [f64; 6]) -> Result<PathBuf> {
    let world_path = world_file_path(output_image);

    // A, D, B, E: pixel size and rotation terms; C, F: center of upper-left pixel
    let a = geotransform[1];
    let d = geotransform[4];
    let b = geotransform[2];
    let e = geotransform[5];
    let c = geotransform[0] + 0.5 * a + 0.5 * b;
    let f = geotransform[3] + 0.5 * d + 0.5 * e;

    let mut file = File::create(&world_path)?;
    for value in [a, d, b, e, c, f] {
        writeln!(file, "{:.12}", value)?;
    }
    Ok(world_path)
}

/// Write a .prj file with the provided projection (WKT or EPSG:XXXX)
pub fn write_prj_file(output_image: &Path, projection: &str) -> Result<PathBuf> {
    let prj_path = output_image.with_extension("prj");
    std::fs::write(&prj_path, projection.as_bytes())?;
    Ok(prj_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_file_extensions() {
        assert_eq!(world_file_path(Path::new("a/out.png")), Path::new("a/out.pgw"));
        assert_eq!(world_file_path(Path::new("out.JPG")), Path::new("out.jgw"));
        assert_eq!(world_file_path(Path::new("out.bmp")), Path::new("out.bw"));
        assert_eq!(world_file_path(Path::new("out")), Path::new("out.wld"));
    }

    #[test]
    fn world_file_uses_pixel_centers() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("scene.png");
        let path = write_world_file(&image, [1000.0, 30.0, 0.0, 5000.0, 0.0, -30.0]).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        let values: Vec<f64> = text.lines().map(|l| l.parse().unwrap()).collect();
        assert_eq!(values, [30.0, 0.0, 0.0, -30.0, 1015.0, 4985.0]);
    }
}

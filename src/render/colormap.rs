//! Color maps for categorical rasters.
//!
//! A `ColorMap` is a 256-entry lookup table plus two special colors: `under`
//! for values below the normalized range and `bad` for NaN. Values above the
//! range take the last table entry.

/// RGBA color
pub type Rgba8 = [u8; 4];

pub const BLACK: Rgba8 = [0, 0, 0, 255];
pub const TRANSPARENT: Rgba8 = [0, 0, 0, 0];

const LUT_SIZE: usize = 256;

/// Linear normalization of data values onto [0, 1] (`vmin` maps to 0, `vmax` to 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Norm {
    pub vmin: f64,
    pub vmax: f64,
}

impl Norm {
    pub const UNIT: Norm = Norm { vmin: 0.0, vmax: 1.0 };

    pub fn new(vmin: f64, vmax: f64) -> Self {
        Self { vmin, vmax }
    }

    pub fn normalize(&self, v: f64) -> f64 {
        let span = self.vmax - self.vmin;
        if span == 0.0 {
            return 0.0;
        }
        (v - self.vmin) / span
    }
}

impl Default for Norm {
    fn default() -> Self {
        Norm::UNIT
    }
}

#[derive(Debug, Clone)]
pub struct ColorMap {
    name: &'static str,
    lut: Vec<Rgba8>,
    under: Rgba8,
    bad: Rgba8,
}

/// Evaluate piecewise-linear segment data `(x, y)` at `x` in [0, 1]
fn segment_value(points: &[(f64, f64)], x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    for pair in points.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if x <= x1 {
            if x1 == x0 {
                return y1;
            }
            return y0 + (y1 - y0) * (x - x0) / (x1 - x0);
        }
    }
    points.last().map(|&(_, y)| y).unwrap_or(0.0)
}

impl ColorMap {
    /// Build a map by sampling red/green/blue segment data at 256 evenly spaced points.
    pub fn from_segments(
        name: &'static str,
        red: &[(f64, f64)],
        green: &[(f64, f64)],
        blue: &[(f64, f64)],
    ) -> Self {
        let to_u8 = |v: f64| (v.clamp(0.0, 1.0) * 255.0) as u8;
        let lut = (0..LUT_SIZE)
            .map(|i| {
                let x = i as f64 / (LUT_SIZE - 1) as f64;
                [
                    to_u8(segment_value(red, x)),
                    to_u8(segment_value(green, x)),
                    to_u8(segment_value(blue, x)),
                    255,
                ]
            })
            .collect();
        Self {
            name,
            lut,
            under: BLACK,
            bad: TRANSPARENT,
        }
    }

    /// The classic "jet" rainbow map (dark blue → cyan → yellow → dark red),
    /// with black below range and transparent NaN.
    pub fn jet() -> Self {
        Self::from_segments(
            "jet",
            &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)],
            &[
                (0.0, 0.0),
                (0.125, 0.0),
                (0.375, 1.0),
                (0.64, 1.0),
                (0.91, 0.0),
                (1.0, 0.0),
            ],
            &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)],
        )
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Color for a data value under `norm`
    pub fn map(&self, value: f64, norm: Norm) -> Rgba8 {
        if value.is_nan() {
            return self.bad;
        }
        let x = norm.normalize(value);
        if x < 0.0 {
            return self.under;
        }
        let idx = ((x * LUT_SIZE as f64) as usize).min(LUT_SIZE - 1);
        self.lut[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jet_endpoints() {
        let jet = ColorMap::jet();
        assert_eq!(jet.map(0.0, Norm::UNIT), [0, 0, 127, 255]);
        assert_eq!(jet.map(1.0, Norm::UNIT), [127, 0, 0, 255]);
        assert_eq!(jet.map(5.0, Norm::UNIT), [127, 0, 0, 255]);
        // middle of the map is green-ish
        let mid = jet.map(0.5, Norm::UNIT);
        assert!(mid[1] == 255 && mid[0] < 200 && mid[2] < 200);
    }

    #[test]
    fn under_and_bad_colors() {
        let jet = ColorMap::jet();
        assert_eq!(jet.map(-0.01, Norm::UNIT), BLACK);
        assert_eq!(jet.map(f64::NAN, Norm::UNIT), TRANSPARENT);
        assert_eq!(jet.map(f64::NEG_INFINITY, Norm::UNIT), BLACK);
    }

    #[test]
    fn norm_shifts_the_lower_limit() {
        let jet = ColorMap::jet();
        let norm = Norm::new(0.01, 1.0);
        assert_eq!(jet.map(0.005, norm), BLACK);
        assert_eq!(jet.map(0.01, norm), jet.map(0.0, Norm::UNIT));
    }
}

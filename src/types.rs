//! Shared types and enums used across the crate.
//! Includes `StretchPolicy`, the `Enhancement` selector, `BandTriplet`,
//! `Window` and `OutputFormat`, together with the string parsers the CLI
//! and JSON presets rely on.
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while parsing user-supplied values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Invalid band triplet '{0}': expected three positive integers like [4,3,2]")]
    BandTriplet(String),

    #[error("Invalid window '{0}': expected four non-negative integers like [0,0,200,200]")]
    Window(String),

    #[error("Invalid enhancement '{0}': expected a code 1-7 or a range like [lo,hi]")]
    Enhancement(String),

    #[error("Invalid class labels '{0}'")]
    Labels(String),
}

/// Strip optional surrounding brackets/parentheses and split on commas.
fn split_list(s: &str) -> Vec<&str> {
    let trimmed = s.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .or_else(|| trimmed.strip_prefix('(').and_then(|t| t.strip_suffix(')')))
        .unwrap_or(trimmed);
    if inner.trim().is_empty() {
        return Vec::new();
    }
    inner.split(',').map(str::trim).collect()
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum StretchPolicy {
    Linear255,
    Linear,
    Linear2Pc,
    Equalization,
    Logarithmic2Pc,
    Logarithmic,
    SquareRoot,
}

impl StretchPolicy {
    pub const ALL: [StretchPolicy; 7] = [
        StretchPolicy::Linear255,
        StretchPolicy::Linear,
        StretchPolicy::Linear2Pc,
        StretchPolicy::Equalization,
        StretchPolicy::Logarithmic2Pc,
        StretchPolicy::Logarithmic,
        StretchPolicy::SquareRoot,
    ];

    /// Numeric selector used on the command line (1..=7)
    pub fn code(self) -> u8 {
        match self {
            StretchPolicy::Linear255 => 1,
            StretchPolicy::Linear => 2,
            StretchPolicy::Linear2Pc => 3,
            StretchPolicy::Equalization => 4,
            StretchPolicy::Logarithmic2Pc => 5,
            StretchPolicy::Logarithmic => 6,
            StretchPolicy::SquareRoot => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }
}

impl Default for StretchPolicy {
    fn default() -> Self {
        StretchPolicy::Logarithmic2Pc
    }
}

impl std::fmt::Display for StretchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StretchPolicy::Linear255 => "linear255",
            StretchPolicy::Linear => "linear",
            StretchPolicy::Linear2Pc => "linear2pc",
            StretchPolicy::Equalization => "equalization",
            StretchPolicy::Logarithmic2Pc => "logarithmic2pc",
            StretchPolicy::Logarithmic => "logarithmic",
            StretchPolicy::SquareRoot => "sqrt",
        };
        write!(f, "{}", s)
    }
}

/// Contrast enhancement selector: a named stretch policy or an explicit
/// linear range `[lo, hi]` mapped onto 0..255.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Enhancement {
    Named(StretchPolicy),
    ExplicitRange { lo: f64, hi: f64 },
}

impl Default for Enhancement {
    fn default() -> Self {
        Enhancement::Named(StretchPolicy::default())
    }
}

impl std::fmt::Display for Enhancement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Enhancement::Named(policy) => write!(f, "{}", policy),
            Enhancement::ExplicitRange { lo, hi } => write!(f, "linear[{}, {}]", lo, hi),
        }
    }
}

impl FromStr for Enhancement {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Enhancement(s.to_string());
        let parts = split_list(s);
        match parts.as_slice() {
            [code] => {
                // integral floats such as "5.0" name a policy too
                let code: f64 = code.parse().map_err(|_| err())?;
                if code.fract() != 0.0 || !(1.0..=7.0).contains(&code) {
                    return Err(err());
                }
                StretchPolicy::from_code(code as u8)
                    .map(Enhancement::Named)
                    .ok_or_else(err)
            }
            [lo, hi] => {
                let lo: f64 = lo.parse().map_err(|_| err())?;
                let hi: f64 = hi.parse().map_err(|_| err())?;
                if !lo.is_finite() || !hi.is_finite() {
                    return Err(err());
                }
                Ok(Enhancement::ExplicitRange { lo, hi })
            }
            _ => Err(err()),
        }
    }
}

/// 1-based band indices assigned to the red, green and blue channels
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BandTriplet {
    pub red: usize,
    pub green: usize,
    pub blue: usize,
}

impl BandTriplet {
    pub fn new(red: usize, green: usize, blue: usize) -> Self {
        Self { red, green, blue }
    }

    /// Clamp every index to the available band count.
    pub fn clamped(self, bands: usize) -> Self {
        Self {
            red: self.red.min(bands),
            green: self.green.min(bands),
            blue: self.blue.min(bands),
        }
    }

    pub fn as_array(&self) -> [usize; 3] {
        [self.red, self.green, self.blue]
    }
}

impl Default for BandTriplet {
    fn default() -> Self {
        Self::new(1, 1, 1)
    }
}

impl std::fmt::Display for BandTriplet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.red, self.green, self.blue)
    }
}

impl FromStr for BandTriplet {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::BandTriplet(s.to_string());
        let values = split_list(s)
            .into_iter()
            .map(|p| p.parse::<usize>().map_err(|_| err()))
            .collect::<Result<Vec<_>, _>>()?;
        match values.as_slice() {
            [r, g, b] if *r > 0 && *g > 0 && *b > 0 => Ok(Self::new(*r, *g, *b)),
            _ => Err(err()),
        }
    }
}

/// Rectangular pixel window: offset (x, y) and size (width, height)
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Window {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Window {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self { x, y, width, height }
    }

    pub fn full(cols: usize, rows: usize) -> Self {
        Self::new(0, 0, cols, rows)
    }

    /// True if the window is non-empty and lies inside a `cols` x `rows` raster.
    pub fn fits(&self, cols: usize, rows: usize) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|end| end <= cols)
            && self.y.checked_add(self.height).is_some_and(|end| end <= rows)
    }
}

impl std::fmt::Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x, self.y, self.width, self.height)
    }
}

impl FromStr for Window {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Window(s.to_string());
        let values = split_list(s)
            .into_iter()
            .map(|p| p.parse::<usize>().map_err(|_| err()))
            .collect::<Result<Vec<_>, _>>()?;
        match values.as_slice() {
            [x, y, w, h] => Ok(Self::new(*x, *y, *w, *h)),
            _ => Err(err()),
        }
    }
}

/// Parse class labels given as `['water','forest']` or `water,forest`.
pub fn parse_labels(s: &str) -> Result<Vec<String>, ParseError> {
    let labels: Vec<String> = split_list(s)
        .into_iter()
        .map(|p| p.trim_matches(|c| c == '\'' || c == '"').to_string())
        .collect();
    if labels.is_empty() {
        return Err(ParseError::Labels(s.to_string()));
    }
    Ok(labels)
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum OutputFormat {
    PNG,
    JPEG, // Lossy, preview only
    TIFF,
}

impl OutputFormat {
    /// Pick the output format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(OutputFormat::PNG),
            "jpg" | "jpeg" => Some(OutputFormat::JPEG),
            "tif" | "tiff" => Some(OutputFormat::TIFF),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhancement_parses_codes_and_ranges() {
        assert_eq!(
            "3".parse::<Enhancement>().unwrap(),
            Enhancement::Named(StretchPolicy::Linear2Pc)
        );
        assert_eq!(
            "[10, 200.5]".parse::<Enhancement>().unwrap(),
            Enhancement::ExplicitRange { lo: 10.0, hi: 200.5 }
        );
        assert_eq!(
            "0,1000".parse::<Enhancement>().unwrap(),
            Enhancement::ExplicitRange { lo: 0.0, hi: 1000.0 }
        );
        assert!("8".parse::<Enhancement>().is_err());
        assert!("0".parse::<Enhancement>().is_err());
        assert!("[1,2,3]".parse::<Enhancement>().is_err());
        assert!("abc".parse::<Enhancement>().is_err());
    }

    #[test]
    fn integral_float_codes_name_a_policy() {
        assert_eq!(
            "5.0".parse::<Enhancement>().unwrap(),
            Enhancement::Named(StretchPolicy::Logarithmic2Pc)
        );
        assert_eq!(
            "[7.0]".parse::<Enhancement>().unwrap(),
            Enhancement::Named(StretchPolicy::SquareRoot)
        );
        assert!("5.5".parse::<Enhancement>().is_err());
        assert!("9".parse::<Enhancement>().is_err());
        assert!("NaN".parse::<Enhancement>().is_err());
    }

    #[test]
    fn policy_codes_round_trip() {
        for policy in StretchPolicy::ALL {
            assert_eq!(StretchPolicy::from_code(policy.code()), Some(policy));
        }
        assert_eq!(Enhancement::default(), Enhancement::Named(StretchPolicy::Logarithmic2Pc));
    }

    #[test]
    fn band_triplet_rejects_zero_and_garbage() {
        assert_eq!("[4,3,2]".parse::<BandTriplet>().unwrap(), BandTriplet::new(4, 3, 2));
        assert_eq!("(1, 2, 3)".parse::<BandTriplet>().unwrap(), BandTriplet::new(1, 2, 3));
        assert!("[0,1,2]".parse::<BandTriplet>().is_err());
        assert!("[1,2]".parse::<BandTriplet>().is_err());
        assert!("[a,b,c]".parse::<BandTriplet>().is_err());
        assert_eq!(BandTriplet::new(5, 9, 1).clamped(4), BandTriplet::new(4, 4, 1));
    }

    #[test]
    fn window_parses_and_checks_bounds() {
        let w: Window = "[10,20,30,40]".parse().unwrap();
        assert_eq!(w, Window::new(10, 20, 30, 40));
        assert!(w.fits(40, 60));
        assert!(!w.fits(39, 60));
        assert!(!Window::new(0, 0, 0, 5).fits(10, 10));
        assert!("[1,2,3]".parse::<Window>().is_err());
        assert!("[-1,0,3,3]".parse::<Window>().is_err());
    }

    #[test]
    fn labels_strip_quotes() {
        assert_eq!(
            parse_labels("['water', \"forest\", urban]").unwrap(),
            vec!["water", "forest", "urban"]
        );
        assert!(parse_labels("[]").is_err());
    }

    #[test]
    fn output_format_from_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a/b.PNG")), Some(OutputFormat::PNG));
        assert_eq!(OutputFormat::from_path(Path::new("x.jpeg")), Some(OutputFormat::JPEG));
        assert_eq!(OutputFormat::from_path(Path::new("x.tif")), Some(OutputFormat::TIFF));
        assert_eq!(OutputFormat::from_path(Path::new("x.eps")), None);
        assert_eq!(OutputFormat::from_path(Path::new("noext")), None);
    }
}

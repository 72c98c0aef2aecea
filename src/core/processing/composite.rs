//! Band assembler: stretch three raw bands and stack them into an RGB composite.
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};
use tracing::debug;

use crate::core::processing::stretch::stretch;
use crate::error::{Error, Result};
use crate::types::Enhancement;

/// RGB composite of shape (rows, cols, 3) with values in [0, 1], channel order R, G, B.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbComposite {
    data: Array3<f64>,
}

impl RgbComposite {
    /// Stack three byte channels and rescale them to [0, 1].
    pub fn from_channels(red: &Array2<u8>, green: &Array2<u8>, blue: &Array2<u8>) -> Result<Self> {
        let dim = red.dim();
        for other in [green.dim(), blue.dim()] {
            if other != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    actual: other,
                });
            }
        }
        let channels = [red, green, blue];
        let data = Array3::from_shape_fn((dim.0, dim.1, 3), |(r, c, k)| {
            channels[k][(r, c)] as f64 / 255.0
        });
        Ok(Self { data })
    }

    /// Composite with the same byte band in all three channels
    pub fn from_gray(band: &Array2<u8>) -> Self {
        let data = Array3::from_shape_fn((band.nrows(), band.ncols(), 3), |(r, c, _)| {
            band[(r, c)] as f64 / 255.0
        });
        Self { data }
    }

    /// (rows, cols)
    pub fn dim(&self) -> (usize, usize) {
        let (rows, cols, _) = self.data.dim();
        (rows, cols)
    }

    pub fn data(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    /// One channel (0 = red, 1 = green, 2 = blue)
    pub fn channel(&self, index: usize) -> ArrayView2<'_, f64> {
        self.data.index_axis(Axis(2), index)
    }

    /// Pixel (r, g, b) at row/col
    pub fn pixel(&self, row: usize, col: usize) -> [f64; 3] {
        [
            self.data[(row, col, 0)],
            self.data[(row, col, 1)],
            self.data[(row, col, 2)],
        ]
    }
}

/// Apply the selected stretch independently to each band and assemble the composite.
pub fn make_composite(
    red: ArrayView2<'_, f64>,
    green: ArrayView2<'_, f64>,
    blue: ArrayView2<'_, f64>,
    enhancement: Enhancement,
) -> Result<RgbComposite> {
    debug!(
        "make_composite: {}x{} pixels, enhancement={}",
        red.ncols(),
        red.nrows(),
        enhancement
    );
    let r = stretch(red, enhancement);
    let g = stretch(green, enhancement);
    let b = stretch(blue, enhancement);
    RgbComposite::from_channels(&r, &g, &b)
}

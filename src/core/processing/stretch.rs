//! Per-band contrast stretches mapping raw samples onto the display range 0..255.
//!
//! Every stretch returns a byte band of the input's shape. Floating point
//! intermediates are clamped to [0, 255] and truncated toward zero when
//! converted to bytes. Constant bands (zero dynamic range) never divide by
//! zero: the affected rescale step is skipped and leaves zeros behind.
use ndarray::{Array2, ArrayView2};
use tracing::debug;

use crate::types::{Enhancement, StretchPolicy};

const NUM_BINS: usize = 256;
const CLIP_FRACTION: f64 = 0.02;

fn min_max(band: &ArrayView2<'_, f64>) -> Option<(f64, f64)> {
    band.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[inline]
fn to_byte(v: f64) -> u8 {
    // `as` saturates and maps NaN to 0
    v.clamp(0.0, 255.0) as u8
}

/// Rescale `[min, max]` of the band onto [0, 255] in floating point.
/// A band without dynamic range is returned unscaled.
fn min_max_rescale(band: &mut Array2<f64>) {
    if let Some((mn, mx)) = min_max(&band.view()) {
        let span = mx - mn;
        if span > 0.0 && span.is_finite() {
            band.mapv_inplace(|v| ((v - mn) * 255.0 / span).clamp(0.0, 255.0));
        } else {
            band.mapv_inplace(|v| v.clamp(0.0, 255.0));
        }
    }
}

/// 256-bin histogram of a byte band over [0, 256)
fn byte_histogram(bytes: &Array2<u8>) -> [u64; NUM_BINS] {
    let mut hist = [0u64; NUM_BINS];
    for &b in bytes.iter() {
        hist[b as usize] += 1;
    }
    hist
}

fn cumulative(hist: &[u64; NUM_BINS]) -> [u64; NUM_BINS] {
    let mut cdf = [0u64; NUM_BINS];
    let mut acc = 0u64;
    for (c, &h) in cdf.iter_mut().zip(hist.iter()) {
        acc += h;
        *c = acc;
    }
    cdf
}

fn apply_lut(bytes: &Array2<u8>, lut: &[u8; NUM_BINS]) -> Array2<u8> {
    bytes.mapv(|b| lut[b as usize])
}

/// Byte stretch: linearly map `[lo, hi]` onto [0, 255], clamping values outside
/// the range. Without an explicit range the band's own min/max are used.
/// A zero-width range yields an all-zero band.
pub fn byte_stretch(band: ArrayView2<'_, f64>, range: Option<(f64, f64)>) -> Array2<u8> {
    let Some((lo, hi)) = range.or_else(|| min_max(&band)) else {
        return Array2::zeros(band.dim());
    };
    let span = hi - lo;
    if span == 0.0 || !span.is_finite() {
        debug!("byte_stretch: degenerate range [{}, {}], returning zeros", lo, hi);
        return Array2::zeros(band.dim());
    }
    band.mapv(|v| to_byte((v - lo) * 255.0 / span))
}

/// Plain linear stretch over the band's own min/max
pub fn linear_stretch(band: ArrayView2<'_, f64>) -> Array2<u8> {
    byte_stretch(band, None)
}

/// Linear stretch treating the raw values as already lying in [0, 255]
pub fn linear255_stretch(band: ArrayView2<'_, f64>) -> Array2<u8> {
    byte_stretch(band, Some((0.0, 255.0)))
}

/// Lower and upper clip bins of the 2% saturation stretch.
///
/// `lower` is the first bin whose cumulative count reaches 2% of the total;
/// `upper` walks down from bin 255 while the cumulative count stays above 98%.
/// Both scans stop at the histogram edges, so near-delta histograms cannot run
/// past the valid bin range.
fn clip_bins(cdf: &[u64; NUM_BINS]) -> (usize, usize) {
    let total = cdf[NUM_BINS - 1] as f64;
    let low_target = CLIP_FRACTION * total;
    let high_target = (1.0 - CLIP_FRACTION) * total;

    let mut lower = 0usize;
    while lower < NUM_BINS - 1 && (cdf[lower] as f64) < low_target {
        lower += 1;
    }
    let mut upper = NUM_BINS - 1;
    while upper > 0 && (cdf[upper] as f64) > high_target {
        upper -= 1;
    }
    (lower, upper)
}

/// 2% saturation linear stretch on a band that is already byte valued.
///
/// When the clip bins cross (`upper <= lower`) the table becomes a threshold:
/// bins from `upper` up saturate to 255, the rest go to 0. A band with a single
/// occupied bin, or whose upper scan reaches bin 0, is returned unchanged.
fn clip_2pc_bytes(bytes: Array2<u8>) -> Array2<u8> {
    let hist = byte_histogram(&bytes);
    let cdf = cumulative(&hist);
    let (lower, upper) = clip_bins(&cdf);
    let occupied = hist.iter().filter(|&&h| h > 0).count();
    let high_target = (1.0 - CLIP_FRACTION) * cdf[NUM_BINS - 1] as f64;
    let scan_exhausted = upper == 0 && cdf[0] as f64 > high_target;
    if occupied <= 1 || scan_exhausted {
        debug!(
            "linear_2pc_stretch: no clip range (lower={} upper={}), leaving band unchanged",
            lower, upper
        );
        return bytes;
    }

    let mut lut = [0u8; NUM_BINS];
    if upper <= lower {
        debug!(
            "linear_2pc_stretch: crossed clip bins lower={} upper={}, thresholding at {}",
            lower, upper, upper
        );
        for (edge, entry) in lut.iter_mut().enumerate() {
            *entry = if edge >= upper { 255 } else { 0 };
        }
        return apply_lut(&bytes, &lut);
    }
    debug!("linear_2pc_stretch: clipping to bins [{}, {}]", lower, upper);

    let span = (upper - lower) as f64;
    for (edge, entry) in lut.iter_mut().enumerate() {
        *entry = if edge <= lower {
            0
        } else if edge >= upper {
            255
        } else {
            to_byte((edge - lower) as f64 * 255.0 / span)
        };
    }
    apply_lut(&bytes, &lut)
}

/// Linear stretch saturating 2% of the pixels at each end of the histogram
pub fn linear_2pc_stretch(band: ArrayView2<'_, f64>) -> Array2<u8> {
    clip_2pc_bytes(byte_stretch(band, None))
}

/// Histogram equalization: bytes are mapped through the scaled cumulative
/// distribution of their 256-bin histogram.
pub fn equalization_stretch(band: ArrayView2<'_, f64>) -> Array2<u8> {
    let bytes = byte_stretch(band, None);
    let cdf = cumulative(&byte_histogram(&bytes));
    let total = cdf[NUM_BINS - 1];
    if total == 0 {
        return bytes;
    }
    let mut lut = [0u8; NUM_BINS];
    for (entry, &c) in lut.iter_mut().zip(cdf.iter()) {
        *entry = to_byte(255.0 * c as f64 / total as f64);
    }
    apply_lut(&bytes, &lut)
}

/// Logarithmic stretch, optionally followed by the 2% saturation stretch.
///
/// Works on a copy of the band: values are shifted so the minimum is not
/// negative, exact zeros are replaced by the band mean (avoids black borders
/// from the log singularity), positive values are log-transformed and the
/// result is rescaled onto [0, 255].
pub fn logarithmic_stretch(band: ArrayView2<'_, f64>, clip_2pc: bool) -> Array2<u8> {
    let mut tmp = band.to_owned();
    if tmp.is_empty() {
        return Array2::zeros(tmp.dim());
    }

    if let Some((mn, _)) = min_max(&tmp.view()) {
        if mn < 0.0 {
            tmp.mapv_inplace(|v| v - mn);
        }
    }
    let mean = tmp.mean().unwrap_or(0.0);
    tmp.mapv_inplace(|v| {
        let v = if v == 0.0 { mean } else { v };
        if v > 0.0 { v.ln() } else { v }
    });
    min_max_rescale(&mut tmp);

    if clip_2pc {
        linear_2pc_stretch(tmp.view())
    } else {
        tmp.mapv(to_byte)
    }
}

/// Square-root stretch followed by the 2% saturation stretch.
/// Negative samples have no real root and are treated as zero.
pub fn sqrt_stretch(band: ArrayView2<'_, f64>) -> Array2<u8> {
    let mut tmp = band.mapv(|v| v.max(0.0).sqrt());
    min_max_rescale(&mut tmp);
    linear_2pc_stretch(tmp.view())
}

/// Apply the stretch selected by `policy`
pub fn stretch_with_policy(band: ArrayView2<'_, f64>, policy: StretchPolicy) -> Array2<u8> {
    match policy {
        StretchPolicy::Linear255 => linear255_stretch(band),
        StretchPolicy::Linear => linear_stretch(band),
        StretchPolicy::Linear2Pc => linear_2pc_stretch(band),
        StretchPolicy::Equalization => equalization_stretch(band),
        StretchPolicy::Logarithmic2Pc => logarithmic_stretch(band, true),
        StretchPolicy::Logarithmic => logarithmic_stretch(band, false),
        StretchPolicy::SquareRoot => sqrt_stretch(band),
    }
}

/// Apply the stretch selected by an `Enhancement`
pub fn stretch(band: ArrayView2<'_, f64>, enhancement: Enhancement) -> Array2<u8> {
    match enhancement {
        Enhancement::Named(policy) => stretch_with_policy(band, policy),
        Enhancement::ExplicitRange { lo, hi } => byte_stretch(band, Some((lo, hi))),
    }
}

//! Classification rasters: integer-coded category bands shown through a color map
//! with one legend tick per class.
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::processing::composite::RgbComposite;
use crate::core::processing::stretch::linear_stretch;
use crate::error::{Error, Result};

/// One legend entry; `position` is the normalized color-map coordinate in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendTick {
    pub position: f64,
    pub label: String,
}

/// A classification band prepared for display
#[derive(Debug, Clone)]
pub struct ClassImage {
    pub composite: RgbComposite,
    /// Span between the highest and lowest class code
    pub num_classes: usize,
    pub min_code: f64,
}

/// Span of class codes (`max - min`) in the band; 0 for an empty or constant band.
pub fn class_span(band: ArrayView2<'_, f64>) -> (f64, usize) {
    let mut iter = band.iter().copied();
    let Some(first) = iter.next() else {
        return (0.0, 0);
    };
    let (mn, mx) = iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    (mn, (mx - mn).round().max(0.0) as usize)
}

/// Linear-stretch a classification band and use it for all three channels.
pub fn make_class_image(band: ArrayView2<'_, f64>) -> ClassImage {
    let (min_code, num_classes) = class_span(band);
    debug!(
        "make_class_image: lowest code {}, {} classes above it",
        min_code, num_classes
    );
    let bytes = linear_stretch(band);
    ClassImage {
        composite: RgbComposite::from_gray(&bytes),
        num_classes,
        min_code,
    }
}

/// Legend with `num_classes + 1` ticks evenly spaced over [0, 1].
/// Default labels are the class offsets "0", "1", ...; custom labels must
/// match the tick count.
pub fn class_legend(num_classes: usize, labels: Option<&[String]>) -> Result<Vec<LegendTick>> {
    let count = num_classes + 1;
    if let Some(labels) = labels {
        if labels.len() != count {
            return Err(Error::InvalidArgument {
                arg: "labels",
                value: format!("{} labels given for {} classes", labels.len(), count),
            });
        }
    }
    let ticks = (0..count)
        .map(|i| {
            let position = if num_classes == 0 {
                0.0
            } else {
                i as f64 / num_classes as f64
            };
            let label = match labels {
                Some(labels) => labels[i].clone(),
                None => i.to_string(),
            };
            LegendTick { position, label }
        })
        .collect();
    Ok(ticks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn four_class_band() -> Array2<f64> {
        Array2::from_shape_fn((4, 4), |(r, c)| ((r * 4 + c) % 4) as f64)
    }

    #[test]
    fn four_codes_give_four_ticks() {
        let image = make_class_image(four_class_band().view());
        assert_eq!(image.num_classes, 3);
        let ticks = class_legend(image.num_classes, None).unwrap();
        let labels: Vec<&str> = ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, ["0", "1", "2", "3"]);
        let positions: Vec<f64> = ticks.iter().map(|t| t.position).collect();
        assert_eq!(positions, [0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0]);
    }

    #[test]
    fn class_values_line_up_with_ticks() {
        let image = make_class_image(four_class_band().view());
        // code k is stretched onto k * 85 / 255
        assert_eq!(image.composite.pixel(0, 0), [0.0; 3]);
        assert_eq!(image.composite.pixel(0, 3), [1.0; 3]);
        assert!((image.composite.pixel(0, 1)[0] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn custom_labels_must_match_tick_count() {
        let labels: Vec<String> = ["water", "forest", "urban", "bare"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let ticks = class_legend(3, Some(&labels)).unwrap();
        assert_eq!(ticks[2].label, "urban");
        assert!(class_legend(2, Some(&labels)).is_err());
    }

    #[test]
    fn constant_band_has_single_tick() {
        let band = Array2::from_elem((3, 3), 7.0);
        let image = make_class_image(band.view());
        assert_eq!(image.num_classes, 0);
        assert_eq!(image.min_code, 7.0);
        let ticks = class_legend(0, None).unwrap();
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].position, 0.0);
    }
}

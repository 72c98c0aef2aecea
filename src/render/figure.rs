//! Figure composition: panels holding painted composites, alpha-blended
//! overlays and a vertical colorbar legend.
//!
//! Panels are laid out left to right and top aligned on a white background.
//! Text (titles, tick labels) is not rasterized; `Figure::describe` reports it
//! together with the pixel layout so viewers and sidecars can place it.
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::core::processing::classes::LegendTick;
use crate::core::processing::composite::RgbComposite;
use crate::render::colormap::{BLACK, ColorMap, Norm};
use crate::types::{BandTriplet, Enhancement, Window};

pub const PANEL_GAP: u32 = 16;
pub const COLORBAR_GAP: u32 = 12;
pub const COLORBAR_WIDTH: u32 = 20;
pub const TICK_LENGTH: u32 = 5;
/// Colorbar height relative to its panel
pub const COLORBAR_SHRINK: f64 = 0.8;
/// Offset subtracted before color mapping so the lowest class falls below range
pub const CLASS_OFFSET: f64 = 0.01;

/// File names longer than this are shortened in single-image titles
pub const TITLE_NAME_LIMIT: usize = 40;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Panel title `"{file}: {enhancement}: {bands}: {window}"`.
pub fn panel_title(
    file_name: &str,
    enhancement: Enhancement,
    bands: &BandTriplet,
    window: &Window,
    shorten: bool,
) -> String {
    let name = if shorten && file_name.chars().count() > TITLE_NAME_LIMIT {
        let head: String = file_name.chars().take(TITLE_NAME_LIMIT - 3).collect();
        format!("{} ... ", head)
    } else {
        file_name.to_string()
    };
    format!("{}: {}: {}: {}", name, enhancement, bands, window)
}

#[inline]
fn unit_to_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Paint an RGB composite, darkening every channel by `offset`.
pub fn paint_rgb(composite: &RgbComposite, offset: f64) -> RgbaImage {
    let (rows, cols) = composite.dim();
    RgbaImage::from_fn(cols as u32, rows as u32, |x, y| {
        let [r, g, b] = composite.pixel(y as usize, x as usize);
        Rgba([
            unit_to_byte(r - offset),
            unit_to_byte(g - offset),
            unit_to_byte(b - offset),
            255,
        ])
    })
}

/// Paint the first channel of a classification composite through a color map.
/// With `transparent_zero`, pixels of the lowest class take the map's bad color.
pub fn paint_classes(
    composite: &RgbComposite,
    colormap: &ColorMap,
    norm: Norm,
    transparent_zero: bool,
) -> RgbaImage {
    let (rows, cols) = composite.dim();
    let values = composite.channel(0);
    RgbaImage::from_fn(cols as u32, rows as u32, |x, y| {
        let v = values[(y as usize, x as usize)];
        let v = if transparent_zero && v == 0.0 { f64::NAN } else { v };
        Rgba(colormap.map(v - CLASS_OFFSET, norm))
    })
}

/// Alpha-blend `top` over `base`, both anchored at the top-left corner.
/// The effective alpha of a pixel is `opacity` times its own alpha.
pub fn blend_over(base: &mut RgbaImage, top: &RgbaImage, opacity: f64) {
    let opacity = opacity.clamp(0.0, 1.0);
    let width = base.width().min(top.width());
    let height = base.height().min(top.height());
    for y in 0..height {
        for x in 0..width {
            let fg = top.get_pixel(x, y);
            let a = opacity * fg[3] as f64 / 255.0;
            let bg = base.get_pixel_mut(x, y);
            for c in 0..3 {
                let v = a * fg[c] as f64 + (1.0 - a) * bg[c] as f64;
                bg[c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Colorbar {
    pub colormap: ColorMap,
    pub ticks: Vec<LegendTick>,
}

#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    pub canvas: RgbaImage,
    pub colorbar: Option<Colorbar>,
}

impl Panel {
    pub fn new(title: impl Into<String>, canvas: RgbaImage) -> Self {
        Self {
            title: title.into(),
            canvas,
            colorbar: None,
        }
    }

    pub fn with_colorbar(mut self, colorbar: Colorbar) -> Self {
        self.colorbar = Some(colorbar);
        self
    }

    /// Width including the colorbar, tick marks and gap
    fn outer_width(&self) -> u32 {
        let mut w = self.canvas.width();
        if self.colorbar.is_some() {
            w += COLORBAR_GAP + COLORBAR_WIDTH + TICK_LENGTH;
        }
        w
    }
}

/// Pixel rectangle inside the rasterized figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickDescription {
    pub label: String,
    /// Row of the tick mark in figure pixels
    pub y: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorbarDescription {
    pub colormap: String,
    pub rect: Rect,
    pub ticks: Vec<TickDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDescription {
    pub title: String,
    pub rect: Rect,
    pub colorbar: Option<ColorbarDescription>,
}

/// Text and geometry of a rasterized figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureDescription {
    pub width: u32,
    pub height: u32,
    pub panels: Vec<PanelDescription>,
}

#[derive(Debug, Clone)]
pub struct Figure {
    panels: Vec<Panel>,
}

impl Figure {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self { panels }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn size(&self) -> (u32, u32) {
        let width = self
            .panels
            .iter()
            .map(Panel::outer_width)
            .sum::<u32>()
            + PANEL_GAP * (self.panels.len().saturating_sub(1) as u32);
        let height = self
            .panels
            .iter()
            .map(|p| p.canvas.height())
            .max()
            .unwrap_or(0);
        (width, height)
    }

    /// Panel rectangle and, when present, colorbar rectangle for each panel
    fn layout(&self) -> Vec<(Rect, Option<Rect>)> {
        let mut x = 0;
        self.panels
            .iter()
            .map(|panel| {
                let (w, h) = panel.canvas.dimensions();
                let rect = Rect { x, y: 0, width: w, height: h };
                let bar = panel.colorbar.as_ref().map(|_| {
                    let bar_h = ((h as f64 * COLORBAR_SHRINK).round() as u32).max(1);
                    Rect {
                        x: x + w + COLORBAR_GAP,
                        y: (h - bar_h.min(h)) / 2,
                        width: COLORBAR_WIDTH,
                        height: bar_h,
                    }
                });
                x += panel.outer_width() + PANEL_GAP;
                (rect, bar)
            })
            .collect()
    }

    fn tick_row(bar: &Rect, position: f64) -> u32 {
        let span = bar.height.saturating_sub(1) as f64;
        bar.y + ((1.0 - position.clamp(0.0, 1.0)) * span).round() as u32
    }

    pub fn describe(&self) -> FigureDescription {
        let (width, height) = self.size();
        let panels = self
            .panels
            .iter()
            .zip(self.layout())
            .map(|(panel, (rect, bar))| PanelDescription {
                title: panel.title.clone(),
                rect,
                colorbar: panel.colorbar.as_ref().zip(bar).map(|(cb, bar)| ColorbarDescription {
                    colormap: cb.colormap.name().to_string(),
                    rect: bar,
                    ticks: cb
                        .ticks
                        .iter()
                        .map(|t| TickDescription {
                            label: t.label.clone(),
                            y: Self::tick_row(&bar, t.position),
                        })
                        .collect(),
                }),
            })
            .collect();
        FigureDescription { width, height, panels }
    }

    pub fn rasterize(&self) -> RgbaImage {
        let (width, height) = self.size();
        let mut out = RgbaImage::from_pixel(width.max(1), height.max(1), BACKGROUND);
        for (panel, (rect, bar)) in self.panels.iter().zip(self.layout()) {
            image::imageops::overlay(&mut out, &panel.canvas, rect.x as i64, rect.y as i64);
            if let (Some(cb), Some(bar)) = (&panel.colorbar, bar) {
                draw_colorbar(&mut out, cb, &bar);
            }
        }
        out
    }
}

fn draw_colorbar(out: &mut RgbaImage, colorbar: &Colorbar, bar: &Rect) {
    for row in 0..bar.height {
        let v = 1.0 - (row as f64 + 0.5) / bar.height as f64;
        let color = Rgba(colorbar.colormap.map(v, Norm::UNIT));
        for col in 0..bar.width {
            out.put_pixel(bar.x + col, bar.y + row, color);
        }
    }
    let black = Rgba(BLACK);
    for col in 0..bar.width {
        out.put_pixel(bar.x + col, bar.y, black);
        out.put_pixel(bar.x + col, bar.y + bar.height - 1, black);
    }
    for row in 0..bar.height {
        out.put_pixel(bar.x, bar.y + row, black);
        out.put_pixel(bar.x + bar.width - 1, bar.y + row, black);
    }
    for tick in &colorbar.ticks {
        let y = Figure::tick_row(bar, tick.position);
        for dx in 0..TICK_LENGTH {
            out.put_pixel(bar.x + bar.width + dx, y, black);
        }
    }
}

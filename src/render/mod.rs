//! Rendering: color maps, painted panels and figure layout.
pub mod colormap;
pub mod figure;

pub use colormap::{ColorMap, Norm};
pub use figure::{Colorbar, Figure, FigureDescription, Panel, panel_title};

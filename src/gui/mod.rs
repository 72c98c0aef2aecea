//! Native figure viewer built on eframe/egui.
pub mod viewer;

pub use viewer::{FigureViewer, show};

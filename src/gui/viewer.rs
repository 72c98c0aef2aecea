use eframe::egui::{self, Color32, RichText};
use eframe::{NativeOptions, egui::ViewportBuilder};
use tracing::{info, warn};

use crate::api::{RenderedFigure, save_figure};
use crate::error::{Error, Result};
use crate::render::colormap::Norm;
use crate::render::figure::{CLASS_OFFSET, Colorbar};

/// Window showing a rendered figure, its panel titles and class legend
pub struct FigureViewer {
    rendered: RenderedFigure,
    texture: Option<egui::TextureHandle>,
    status: Option<String>,
}

impl FigureViewer {
    pub fn new(rendered: RenderedFigure) -> Self {
        Self {
            rendered,
            texture: None,
            status: None,
        }
    }

    fn texture(&mut self, ctx: &egui::Context) -> egui::TextureHandle {
        self.texture
            .get_or_insert_with(|| {
                let raster = self.rendered.figure.rasterize();
                let size = [raster.width() as usize, raster.height() as usize];
                let image = egui::ColorImage::from_rgba_unmultiplied(size, raster.as_raw());
                ctx.load_texture("figure", image, egui::TextureOptions::NEAREST)
            })
            .clone()
    }

    fn save_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg", "tif", "tiff"])
            .set_file_name("figure.png")
            .save_file()
        {
            match save_figure(&self.rendered, &path) {
                Ok(()) => {
                    info!("Saved figure to {:?}", path);
                    self.status = Some(format!("Saved {}", path.display()));
                }
                Err(e) => {
                    warn!("Saving figure to {:?} failed: {}", path, e);
                    self.status = Some(format!("Save failed: {}", e));
                }
            }
        }
    }
}

fn legend_entries(ui: &mut egui::Ui, colorbar: &Colorbar) {
    // highest class first, as on the colorbar
    for tick in colorbar.ticks.iter().rev() {
        let [r, g, b, a] = colorbar
            .colormap
            .map(tick.position - CLASS_OFFSET, Norm::UNIT);
        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
            ui.painter()
                .rect_filled(rect, 2.0, Color32::from_rgba_unmultiplied(r, g, b, a));
            ui.label(&tick.label);
        });
    }
}

impl eframe::App for FigureViewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("titles").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Save as…").clicked() {
                    self.save_as();
                }
                if let Some(status) = &self.status {
                    ui.label(RichText::new(status).color(Color32::from_gray(120)));
                }
            });
            for panel in self.rendered.figure.panels() {
                ui.label(RichText::new(&panel.title).strong());
            }
        });

        let colorbars: Vec<&Colorbar> = self
            .rendered
            .figure
            .panels()
            .iter()
            .filter_map(|p| p.colorbar.as_ref())
            .collect();
        if !colorbars.is_empty() {
            egui::SidePanel::right("legend").show(ctx, |ui| {
                ui.heading("Classes");
                for colorbar in colorbars {
                    legend_entries(ui, colorbar);
                }
            });
        }

        let texture = self.texture(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add(egui::Image::from_texture(&texture).shrink_to_fit());
        });
    }
}

/// Open a native window for the figure and block until it is closed
pub fn show(rendered: RenderedFigure) -> Result<()> {
    let (width, height) = rendered.figure.size();
    let title = rendered
        .figure
        .panels()
        .first()
        .map(|p| p.title.clone())
        .unwrap_or_else(|| "mscomposite".to_string());
    let options = NativeOptions {
        viewport: ViewportBuilder::default()
            .with_title(title)
            .with_inner_size([
                (width as f32 + 220.0).clamp(400.0, 1600.0),
                (height as f32 + 120.0).clamp(300.0, 1000.0),
            ])
            .with_min_inner_size([300.0, 200.0]),
        ..Default::default()
    };

    eframe::run_native(
        "mscomposite",
        options,
        Box::new(|_cc| Ok(Box::new(FigureViewer::new(rendered)))),
    )
    .map_err(Error::external)
}

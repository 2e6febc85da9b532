//! egui front-end for the point/line picker: renders a 2-D array as a
//! grayscale texture, translates pointer clicks into [`PointBrowser`] events
//! and draws the accumulated markers and polylines. Closing the window
//! returns the picked polylines to the caller.
use std::sync::{Arc, Mutex};

use eframe::egui::{
    self, Color32, ColorImage, Pos2, Rect, Sense, Stroke, TextureHandle, TextureOptions,
};
use eframe::{NativeOptions, egui::ViewportBuilder};
use ndarray::Array2;
use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};
use crate::picker::{ClickKind, PointBrowser, Polyline};

static LOG_INIT: OnceCell<()> = OnceCell::new();

/// Console logging for the picker binary, honoring `RUST_LOG`.
pub fn init_picker_logging() {
    LOG_INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .try_init();
    });
}

pub struct PickerApp {
    image: ColorImage,
    texture: Option<TextureHandle>,
    browser: PointBrowser,
    picked: Arc<Mutex<Vec<Polyline>>>,
}

impl PickerApp {
    pub fn new(data: &Array2<f64>, picked: Arc<Mutex<Vec<Polyline>>>) -> Self {
        Self {
            image: grayscale_image(data),
            texture: None,
            browser: PointBrowser::new(data.dim()),
            picked,
        }
    }

    fn click_kind(input: &egui::InputState) -> ClickKind {
        if input.key_down(egui::Key::Z) {
            ClickKind::Skip
        } else if input.modifiers.any() {
            ClickKind::NewLine
        } else {
            ClickKind::Extend
        }
    }

    fn to_screen(&self, rect: Rect, point: (f64, f64)) -> Pos2 {
        let (rows, cols) = self.browser.shape();
        Pos2 {
            x: rect.min.x + (point.0 as f32 + 0.5) / cols as f32 * rect.width(),
            y: rect.min.y + (point.1 as f32 + 0.5) / rows as f32 * rect.height(),
        }
    }
}

impl eframe::App for PickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let texture = self.texture.get_or_insert_with(|| {
                ctx.load_texture("picker-data", self.image.clone(), TextureOptions::NEAREST)
            });

            let (rows, cols) = self.browser.shape();
            let available = ui.available_size();
            let aspect = cols as f32 / rows as f32;
            let size = if available.x / available.y > aspect {
                egui::vec2(available.y * aspect, available.y)
            } else {
                egui::vec2(available.x, available.x / aspect)
            };
            let (rect, response) = ui.allocate_exact_size(size, Sense::click());
            let painter = ui.painter_at(rect);
            painter.image(
                texture.id(),
                rect,
                Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );

            if response.clicked() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let x = ((pos.x - rect.min.x) / rect.width() * cols as f32) as f64;
                    let y = ((pos.y - rect.min.y) / rect.height() * rows as f32) as f64;
                    let kind = ctx.input(Self::click_kind);
                    self.browser.click(x.floor(), y.floor(), kind);
                }
            }

            for line in self.browser.polylines() {
                let screen: Vec<Pos2> = line
                    .iter()
                    .map(|&point| self.to_screen(rect, point))
                    .collect();
                for pair in screen.windows(2) {
                    painter.line_segment(
                        [pair[0], pair[1]],
                        Stroke::new(1.5, Color32::LIGHT_BLUE),
                    );
                }
                for pos in screen {
                    painter.circle_filled(pos, 3.0, Color32::RED);
                }
            }
        });

        if let Ok(mut picked) = self.picked.lock() {
            *picked = self.browser.polylines();
        }
    }
}

/// Min/max normalized grayscale rendering of the data array. Non-finite
/// values render black.
fn grayscale_image(data: &Array2<f64>) -> ColorImage {
    let (rows, cols) = data.dim();
    let finite = data.iter().copied().filter(|v| v.is_finite());
    let min = finite.clone().fold(f64::INFINITY, f64::min);
    let max = finite.fold(f64::NEG_INFINITY, f64::max);
    let span = if max > min { max - min } else { 1.0 };
    let pixels: Vec<u8> = data
        .iter()
        .map(|&v| {
            if v.is_finite() {
                (((v - min) / span) * 255.0) as u8
            } else {
                0
            }
        })
        .collect();
    ColorImage::from_gray([cols, rows], &pixels)
}

/// Open the picker window over `data` and block until it is closed.
/// Returns the polylines picked during the session.
pub fn pick_points(data: &Array2<f64>) -> Result<Vec<Polyline>> {
    let picked = Arc::new(Mutex::new(Vec::new()));
    let app = PickerApp::new(data, Arc::clone(&picked));
    let options = NativeOptions {
        viewport: ViewportBuilder::default().with_inner_size([900.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native(
        "bandmap picker",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(Error::external)?;
    let lines = picked
        .lock()
        .map_err(|_| Error::Processing("picker state lock poisoned".to_string()))?
        .clone();
    Ok(lines)
}

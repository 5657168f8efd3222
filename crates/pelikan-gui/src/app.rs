use crate::editor::Editor;
use eframe::egui;
use pelikan_core::params::{CANVAS_RANGE, RADIUS_RANGE, SCALE_RANGE};
use pelikan_core::{IcnsBackend, Preset, RenderParams, Settings, Shape};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

const PREVIEW_MAX_HEIGHT: f32 = 400.0;
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "tiff", "tif", "bmp"];

/// A status bar line that disappears after `ttl`.
struct StatusMessage {
    text: String,
    shown_at: Instant,
    ttl: Duration,
}

/// A blocking message shown in a modal window.
struct ErrorDialog {
    title: String,
    message: String,
}

/// Main application struct
pub struct PelikanApp {
    editor: Editor,
    preset: Preset,
    texture: Option<(u64, egui::TextureHandle)>,
    settings: Settings,
    settings_path: Option<PathBuf>,
    status: Option<StatusMessage>,
    error: Option<ErrorDialog>,
    show_about: bool,
}

impl PelikanApp {
    /// Create the app with persisted settings, optionally opening `initial`.
    pub fn new(settings_path: Option<PathBuf>, initial: Option<PathBuf>) -> Self {
        let settings = match &settings_path {
            Some(path) => Settings::load(path).unwrap_or_else(|e| {
                warn!("ignoring settings: {}", e);
                Settings::default()
            }),
            None => Settings::default(),
        };

        let mut app = PelikanApp {
            editor: Editor::new(settings.params),
            preset: Preset::detect(&settings.params),
            texture: None,
            settings,
            settings_path,
            status: None,
            error: None,
            show_about: false,
        };
        if let Some(path) = initial {
            app.load_image(&path);
        }
        app
    }

    fn load_image(&mut self, path: &Path) {
        match self.editor.load(path) {
            Ok(()) => {
                info!(path = %path.display(), "image opened");
                self.settings.last_open_dir = path.parent().map(Path::to_path_buf);
            }
            Err(e) => {
                self.error = Some(ErrorDialog {
                    title: "Error".to_string(),
                    message: format!("Couldn't open file:\n{}", e),
                });
            }
        }
    }

    fn update_params(&mut self, params: RenderParams) {
        if let Err(e) = self.editor.set_params(params) {
            self.error = Some(ErrorDialog {
                title: "Error".to_string(),
                message: e.to_string(),
            });
        }
    }

    fn set_status(&mut self, text: String, ttl_secs: u64) {
        self.status = Some(StatusMessage {
            text,
            shown_at: Instant::now(),
            ttl: Duration::from_secs(ttl_secs),
        });
    }

    fn persist_settings(&mut self) {
        self.settings.params = *self.editor.params();
        let Some(path) = &self.settings_path else {
            return;
        };
        if let Err(e) = self.settings.save(path) {
            warn!("couldn't save settings: {}", e);
        }
    }

    /// Save dialogs start where the last export went, else next to the source.
    fn save_start_dir(&self) -> Option<PathBuf> {
        self.settings
            .last_save_dir
            .clone()
            .or_else(|| self.settings.last_open_dir.clone())
    }

    fn open_image(&mut self) {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Open image")
            .add_filter("Images", IMAGE_EXTENSIONS);
        if let Some(dir) = self.settings.last_open_dir.clone() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            self.load_image(&path);
        }
    }

    fn save_png(&mut self) {
        if self.editor.preview().is_none() {
            return;
        }
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save PNG")
            .add_filter("PNG", &["png"])
            .set_file_name(format!("{}.png", self.editor.icon_name()));
        if let Some(dir) = self.save_start_dir() {
            dialog = dialog.set_directory(dir);
        }
        let Some(path) = dialog.save_file() else {
            return;
        };

        match self.editor.save_png(&path) {
            Ok(_) => {
                self.set_status(format!("Saved \u{2192} {}", path.display()), 4);
                self.settings.last_save_dir = path.parent().map(Path::to_path_buf);
                self.persist_settings();
            }
            Err(e) => {
                self.error = Some(ErrorDialog {
                    title: "Save failed".to_string(),
                    message: e.to_string(),
                });
            }
        }
    }

    fn save_icns(&mut self) {
        if self.editor.preview().is_none() {
            return;
        }
        let mut dialog = rfd::FileDialog::new().set_title("Pick folder");
        if let Some(dir) = self.save_start_dir() {
            dialog = dialog.set_directory(dir);
        }
        let Some(folder) = dialog.pick_folder() else {
            return;
        };

        match self.editor.save_icns(&folder, IcnsBackend::Auto) {
            Ok(Some(icns)) => {
                self.set_status(format!(".icns generated at {}", icns.display()), 6);
                self.settings.last_save_dir = Some(folder);
                self.persist_settings();
            }
            Ok(None) => {}
            Err(e) => {
                self.error = Some(ErrorDialog {
                    title: ".icns export failed".to_string(),
                    message: format!(
                        "The icon couldn't be packed.\nOn macOS this needs iconutil from the Xcode Command Line Tools.\n\n{}",
                        e
                    ),
                });
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(path) = dropped.into_iter().find_map(|file| file.path) {
            self.load_image(&path);
        }
    }

    fn refresh_texture(&mut self, ctx: &egui::Context) {
        let revision = self.editor.revision();
        if matches!(&self.texture, Some((r, _)) if *r == revision) {
            return;
        }
        self.texture = self.editor.preview().map(|preview| {
            let size = [preview.width() as usize, preview.height() as usize];
            let image = egui::ColorImage::from_rgba_unmultiplied(size, preview.as_raw());
            let handle = ctx.load_texture("preview", image, egui::TextureOptions::LINEAR);
            (revision, handle)
        });
    }

    fn render_menu(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("About Icon Pelikan \u{2026}").clicked() {
                self.show_about = true;
            }
        });
    }

    fn render_preview(&self, ui: &mut egui::Ui, hovering: bool) {
        ui.centered_and_justified(|ui| {
            if hovering {
                ui.label(egui::RichText::new("Drop to open").size(18.0).strong());
                return;
            }
            match &self.texture {
                Some((_, texture)) => {
                    let side = PREVIEW_MAX_HEIGHT.min(ui.available_height()).min(ui.available_width());
                    let sized = egui::load::SizedTexture::new(texture.id(), egui::vec2(side, side));
                    ui.add(egui::Image::from_texture(sized));
                }
                None => {
                    ui.label(
                        egui::RichText::new("Drop an image or click \u{2018}Open\u{2019}")
                            .size(14.0)
                            .color(egui::Color32::from_rgb(0xd8, 0xd9, 0xda)),
                    );
                }
            }
        });
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        let mut params = *self.editor.params();

        if ui.button("Open Image").clicked() {
            self.open_image();
        }
        ui.add_space(12.0);

        ui.label("Canvas px");
        ui.add(egui::Slider::new(&mut params.canvas_px, CANVAS_RANGE));
        ui.label("Scale %");
        ui.add(egui::Slider::new(&mut params.scale_percent, SCALE_RANGE));
        ui.label("Radius px");
        ui.add_enabled(
            params.shape == Shape::Rounded,
            egui::Slider::new(&mut params.radius_px, RADIUS_RANGE),
        );

        ui.add_space(8.0);
        ui.label("Shape");
        egui::ComboBox::from_id_salt("shape")
            .selected_text(params.shape.as_str())
            .show_ui(ui, |ui| {
                for shape in Shape::ALL {
                    ui.selectable_value(&mut params.shape, shape, shape.as_str());
                }
            });

        ui.label("Preset");
        let mut preset = self.preset;
        egui::ComboBox::from_id_salt("preset")
            .selected_text(preset.label())
            .show_ui(ui, |ui| {
                for candidate in Preset::ALL {
                    ui.selectable_value(&mut preset, candidate, candidate.label());
                }
            });
        if preset != self.preset {
            preset.apply(&mut params);
        }

        ui.add_space(8.0);
        ui.checkbox(&mut params.solid_background, "Solid background");
        ui.horizontal(|ui| {
            let mut rgb = [params.background.r, params.background.g, params.background.b];
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                params.background = pelikan_core::Rgb::new(rgb[0], rgb[1], rgb[2]);
                params.solid_background = true;
            }
            ui.label("Pick colour");
        });

        if preset != self.preset {
            self.preset = preset;
        } else if params != *self.editor.params() {
            self.preset = Preset::detect(&params);
        }
        if params != *self.editor.params() {
            self.update_params(params);
        }

        ui.add_space(16.0);
        let has_preview = self.editor.preview().is_some();
        if ui.add_enabled(has_preview, egui::Button::new("Save PNG")).clicked() {
            self.save_png();
        }
        if ui.add_enabled(has_preview, egui::Button::new("Save .icns")).clicked() {
            self.save_icns();
        }
    }

    fn render_status(&mut self, ui: &mut egui::Ui) {
        let expired = match &self.status {
            Some(status) if status.shown_at.elapsed() < status.ttl => {
                ui.label(egui::RichText::new(status.text.as_str()).small());
                false
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.status = None;
        }
    }

    fn render_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(dialog) = &self.error {
            let mut close = false;
            egui::Window::new(dialog.title.as_str())
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(dialog.message.as_str());
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        close = true;
                    }
                });
            if close {
                self.error = None;
            }
        }

        if self.show_about {
            egui::Window::new("About Icon Pelikan")
                .collapsible(false)
                .resizable(false)
                .open(&mut self.show_about)
                .show(ctx, |ui| {
                    ui.label("A tiny brutalist icon generator written in Rust (egui + image).");
                    ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                });
        }
    }
}

impl eframe::App for PelikanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.refresh_texture(ctx);
        let hovering = ctx.input(|i| !i.raw.hovered_files.is_empty());

        egui::TopBottomPanel::top("menu").show(ctx, |ui| self.render_menu(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.render_status(ui));
        egui::SidePanel::right("controls")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.add_space(16.0);
                self.render_controls(ui);
            });
        egui::CentralPanel::default().show(ctx, |ui| self.render_preview(ui, hovering));

        self.render_dialogs(ctx);

        // keep ticking so the status line can expire
        if self.status.is_some() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

/// Run the GUI application
pub fn run(settings_path: Option<PathBuf>, initial: Option<PathBuf>) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Icon Pelikan")
            .with_inner_size([900.0, 600.0])
            .with_min_inner_size([640.0, 480.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Icon Pelikan",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(PelikanApp::new(settings_path, initial)))
        }),
    )
}

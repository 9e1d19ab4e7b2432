use crate::canvas::Canvas;
use crate::config::MeasureOptions;
use crate::draw_state::Effect;
use crate::geometry::LineKind;
use crate::image_loader::{IMAGE_EXTENSIONS, ImageLoader, LoadSource};
use crate::render;
use crate::session::Session;
use eframe::egui::color_picker::Alpha;
use eframe::egui::{self, Align, Button, Color32, Context, Key, Layout, TextEdit, Visuals};
use std::path::PathBuf;

/// main application state
pub struct Measurer {
    // everything tied to the currently loaded image
    session: Session,

    loader: ImageLoader,
    canvas: Canvas,

    // the file picked with "Choose…", loaded on "Load"
    selected_file: Option<PathBuf>,

    // last load/export failure, shown in the status bar
    last_error: Option<String>,

    options: MeasureOptions,
    show_options: bool,
}

impl Measurer {
    pub fn new(cc: &eframe::CreationContext<'_>, options: MeasureOptions) -> Self {
        cc.egui_ctx.set_visuals(Visuals::light());
        Measurer {
            session: Session::new(),
            loader: ImageLoader::new(),
            canvas: Canvas::new(),
            selected_file: None,
            last_error: None,
            options,
            show_options: false,
        }
    }

    /// carry out a side effect requested by the session
    fn apply(&mut self, effect: Effect, ctx: &Context) {
        match effect {
            Effect::Redraw => {
                let redrawn = self
                    .session
                    .render(&self.options)
                    .and_then(|image| self.canvas.refresh(ctx, image));
                if let Err(e) = redrawn {
                    log::error!("redraw failed: {}", e);
                    self.last_error = Some(format!("Redraw failed: {}", e));
                }
            }
        }
    }

    fn poll_loader(&mut self, ctx: &Context) {
        if self.loader.is_pending() {
            ctx.request_repaint();
        }
        let Some(outcome) = self.loader.poll() else {
            return;
        };
        let max_side = ctx.input(|i| i.max_texture_side);
        match self.session.finish_load(outcome.result, max_side) {
            Ok(effect) => {
                self.last_error = None;
                self.apply(effect, ctx);
            }
            Err(e) => {
                log::warn!("could not load {}: {}", outcome.source, e);
                self.last_error = Some(format!("Could not load {}: {}", outcome.source, e));
            }
        }
    }

    // first dropped file wins
    fn handle_dropped_files(&mut self, ctx: &Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        if let Some(path) = file.path {
            self.selected_file = Some(path.clone());
            self.loader.request(LoadSource::Path(path));
        } else if let Some(bytes) = file.bytes {
            self.loader.request(LoadSource::Bytes {
                name: file.name,
                bytes,
            });
        }
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        // don't steal letters typed into the reference length field
        if ctx.wants_keyboard_input() {
            return;
        }
        if ctx.input(|i| i.key_pressed(Key::R)) {
            self.session.select_mode(LineKind::Reference);
        }
        if ctx.input(|i| i.key_pressed(Key::M)) {
            self.session.select_mode(LineKind::Measure);
        }
    }

    fn choose_file(&mut self) {
        match rfd::FileDialog::new()
            .add_filter("PNG image", IMAGE_EXTENSIONS)
            .pick_file()
        {
            Some(path) => self.selected_file = Some(path),
            None => log::debug!("file selection cancelled"),
        }
    }

    fn load_selected(&mut self) {
        match &self.selected_file {
            Some(path) => self.loader.request(LoadSource::Path(path.clone())),
            None => log::debug!("load pressed with no file selected"),
        }
    }

    fn export(&mut self) {
        let Some(image) = self.canvas.composed() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", IMAGE_EXTENSIONS)
            .set_file_name("measurement.png")
            .save_file()
        else {
            return;
        };
        if let Err(e) = render::export_png(image, &path) {
            log::error!("export to {} failed: {}", path.display(), e);
            self.last_error = Some(format!("Export failed: {}", e));
        }
    }
}

impl eframe::App for Measurer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader(ctx);
        self.handle_dropped_files(ctx);
        self.handle_shortcuts(ctx);

        self.show_controls_panel(ctx);
        self.show_status_bar(ctx);
        self.show_options_window(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(effect) = self.canvas.show(ui, &mut self.session, &self.options) {
                self.apply(effect, ctx);
            }
        });
    }
}

impl Measurer {
    // file, mode and calculation controls across the top
    fn show_controls_panel(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("controls")
            .resizable(false)
            .show(ctx, |ui| {
                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                    if ui.button("Choose…").clicked() {
                        self.choose_file();
                    }
                    let chosen = self
                        .selected_file
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "No file chosen".to_owned());
                    ui.label(chosen);
                    if ui.button("Load").clicked() {
                        self.load_selected();
                    }
                    if self.loader.is_pending() {
                        ui.spinner();
                    }

                    ui.separator();

                    let kind = self.session.state().kind();
                    if ui
                        .selectable_label(kind == LineKind::Reference, LineKind::Reference.label())
                        .clicked()
                    {
                        self.session.select_mode(LineKind::Reference);
                    }
                    if ui
                        .selectable_label(kind == LineKind::Measure, LineKind::Measure.label())
                        .clicked()
                    {
                        self.session.select_mode(LineKind::Measure);
                    }

                    ui.separator();

                    ui.label("Reference length:");
                    ui.add(
                        TextEdit::singleline(&mut self.session.reference_input)
                            .desired_width(80.0)
                            .hint_text("e.g. 50"),
                    );
                    if ui.button("Calculate").clicked() {
                        let value = self.session.calculate();
                        log::info!("measured length {}", value);
                    }
                    let mut shown = self
                        .session
                        .result()
                        .map(|v| self.options.format_length(v))
                        .unwrap_or_default();
                    ui.add(
                        TextEdit::singleline(&mut shown)
                            .desired_width(100.0)
                            .interactive(false),
                    );

                    ui.separator();

                    let can_export = self.canvas.composed().is_some();
                    if ui.add_enabled(can_export, Button::new("Export PNG…")).clicked() {
                        self.export();
                    }
                    if ui.button("Options").clicked() {
                        self.show_options = !self.show_options;
                    }
                });
            });
    }

    fn show_status_bar(&mut self, ctx: &Context) {
        egui::TopBottomPanel::bottom("status")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if let Some(bitmap) = self.session.bitmap() {
                        ui.label(format!("{} × {}", bitmap.width(), bitmap.height()));
                        ui.separator();
                        ui.label(self.session.state().prompt());
                    } else {
                        ui.label("No image loaded");
                    }
                    if let Some(err) = &self.last_error {
                        ui.separator();
                        ui.colored_label(Color32::from_rgb(200, 30, 30), err);
                    }
                });
            });
    }

    // options window
    fn show_options_window(&mut self, ctx: &Context) {
        let mut open = self.show_options;
        let mut restyled = false;
        egui::Window::new("Options")
            .open(&mut open)
            .anchor(egui::Align2::RIGHT_TOP, egui::Vec2::new(-10.0, 50.0))
            .show(ctx, |ui| {
                restyled |= color_row(ui, "Reference color", &mut self.options.reference_color);
                restyled |= color_row(ui, "Measure color", &mut self.options.measure_color);

                let thickness = egui::Slider::new(&mut self.options.line_thickness, 1.0..=20.0)
                    .text("Line thickness");
                restyled |= ui.add(thickness).changed();

                ui.horizontal(|ui| {
                    ui.label("Unit:");
                    ui.add(TextEdit::singleline(&mut self.options.unit).desired_width(60.0));
                });
                ui.add(egui::Slider::new(&mut self.options.decimals, 0..=6).text("Decimals"));

                if ui.button("Save options").clicked() {
                    let path = MeasureOptions::config_path();
                    if let Err(e) = self.options.save_to_file(&path) {
                        log::error!("saving options to {} failed: {}", path.display(), e);
                        self.last_error = Some(format!("Saving options failed: {}", e));
                    }
                }
            });
        self.show_options = open;

        if restyled && self.session.bitmap().is_some() {
            self.apply(Effect::Redraw, ctx);
        }
    }
}

fn color_row(ui: &mut egui::Ui, label: &str, rgba: &mut [u8; 4]) -> bool {
    ui.horizontal(|ui| {
        let mut c = Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3]);
        let changed =
            egui::widgets::color_picker::color_edit_button_srgba(ui, &mut c, Alpha::Opaque)
                .changed();
        ui.label(label);
        if changed {
            *rgba = c.to_srgba_unmultiplied();
        }
        changed
    })
    .inner
}

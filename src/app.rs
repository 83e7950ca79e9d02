use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use egui::{Color32, Key, Sense};
use uuid::Uuid;

use crate::color::PaintColor;
use crate::config::EditorConfig;
use crate::error::EditorResult;
use crate::event::EditorEvent;
use crate::face::FaceId;
use crate::input::InputHandler;
use crate::renderer::Renderer;
use crate::session::{self, EditorSession, HistoryControl};
use crate::store::KeyValueStore;
use crate::tools::Tool;

/// Settings restored between runs
#[derive(serde::Deserialize, serde::Serialize, Debug, Clone)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct AppSettings {
    pub config: EditorConfig,
    pub face: FaceId,
    /// Custom texture being edited
    pub texture: Uuid,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            config: EditorConfig::default(),
            face: FaceId::default(),
            texture: Uuid::new_v4(),
        }
    }
}

/// What the session last told us
#[derive(Debug, Default)]
struct Feedback {
    can_undo: bool,
    can_redo: bool,
    picked: Option<Option<String>>,
    commits: usize,
}

pub struct PixelEditorApp {
    settings: AppSettings,
    session: EditorSession,
    renderer: Renderer,
    input: InputHandler,
    store: Box<dyn KeyValueStore>,
    feedback: Rc<RefCell<Feedback>>,
    status: String,
}

impl PixelEditorApp {
    /// Called once before the first frame. A `config` from the command line wins over
    /// the one restored from the last run.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: Option<EditorConfig>,
    ) -> EditorResult<Self> {
        let mut settings: AppSettings = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        if let Some(config) = config {
            settings.config = config;
        }
        if let Err(err) = settings.config.validate() {
            log::warn!("Discarding stored config: {}", err);
            settings.config = EditorConfig::default();
        }

        Self::with_store(settings, default_store())
    }

    /// Builds the app around an explicit store
    pub fn with_store(settings: AppSettings, store: Box<dyn KeyValueStore>) -> EditorResult<Self> {
        let session = EditorSession::open_saved(
            settings.config.clone(),
            store.as_ref(),
            settings.texture,
            settings.face,
        )?;

        let feedback = Rc::new(RefCell::new(Feedback::default()));
        let sink = Rc::clone(&feedback);
        session.subscribe(Box::new(move |event: &EditorEvent| {
            let mut feedback = sink.borrow_mut();
            match event {
                EditorEvent::HistoryChanged { can_undo, can_redo } => {
                    feedback.can_undo = *can_undo;
                    feedback.can_redo = *can_redo;
                }
                EditorEvent::ColorPicked(hex) => feedback.picked = Some(hex.clone()),
                EditorEvent::TextureApplied { .. } => feedback.commits += 1,
                EditorEvent::ToolChanged { .. } => {}
            }
        }));

        Ok(Self {
            renderer: Renderer::new(&settings.config),
            settings,
            session,
            input: InputHandler::new(),
            store,
            feedback,
            status: String::new(),
        })
    }

    fn switch_face(&mut self, face: FaceId) {
        if face == self.session.face() {
            return;
        }
        // Only the initial state means nothing was edited on this face
        if self.session.history_state().len > 1 {
            self.save();
        }
        let source = session::saved_source(self.store.as_ref(), self.settings.texture, face);
        match self.session.select_face(face, &source) {
            Ok(()) => {
                self.settings.face = face;
                let mut feedback = self.feedback.borrow_mut();
                feedback.can_undo = false;
                feedback.can_redo = false;
            }
            Err(err) => log::error!("Failed to open {}: {}", face, err),
        }
    }

    fn save(&mut self) {
        self.status = match self.session.save(self.store.as_ref(), self.settings.texture) {
            Ok(()) => format!("Saved {}", self.session.face()),
            Err(err) => {
                log::error!("Failed to save texture: {}", err);
                format!("Save failed: {}", err)
            }
        };
    }

    /// Where Export PNG writes the current face
    fn export_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_{}.png", self.settings.texture, self.session.face()))
    }

    fn export(&mut self, path: &Path) {
        let written = self
            .session
            .export_png()
            .and_then(|png| Ok(std::fs::write(path, png)?));
        self.status = match written {
            Ok(()) => {
                log::info!("Exported {} to {}", self.session.face(), path.display());
                format!("Exported {}", path.display())
            }
            Err(err) => {
                log::error!("Failed to export texture: {}", err);
                format!("Export failed: {}", err)
            }
        };
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo) = ctx.input(|i| {
            let undo = i.modifiers.command && !i.modifiers.shift && i.key_pressed(Key::Z);
            let redo = i.modifiers.command
                && (i.key_pressed(Key::Y) || (i.modifiers.shift && i.key_pressed(Key::Z)));
            (undo, redo)
        });
        if undo {
            self.session.undo();
        }
        if redo {
            self.session.redo();
        }
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let (can_undo, can_redo) = {
                let feedback = self.feedback.borrow();
                (feedback.can_undo, feedback.can_redo)
            };
            if ui.add_enabled(can_undo, egui::Button::new("⟲ Undo")).clicked() {
                self.session.undo();
            }
            if ui.add_enabled(can_redo, egui::Button::new("⟳ Redo")).clicked() {
                self.session.redo();
            }

            ui.separator();

            let mut face = self.session.face();
            egui::ComboBox::from_label("Face")
                .selected_text(face.name())
                .show_ui(ui, |ui| {
                    for option in FaceId::ALL {
                        ui.selectable_value(&mut face, option, option.name());
                    }
                });
            self.switch_face(face);

            if ui.button("Save").clicked() {
                self.save();
            }
            if cfg!(not(target_arch = "wasm32")) && ui.button("Export PNG").clicked() {
                let path = self.export_path();
                self.export(&path);
            }

            ui.separator();
            let state = self.session.history_state();
            ui.label(format!("History {}/{}", state.index + 1, state.len));
            if !self.status.is_empty() {
                ui.label(&self.status);
            }
        });
    }

    fn tools_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Tools");
        ui.separator();

        let active = self.session.effective_tool();
        for tool in Tool::ALL {
            let label = format!("{} {}", tool.icon(), tool.name());
            if ui.selectable_label(active == tool, label).clicked() {
                self.session.set_tool(tool);
            }
        }

        ui.separator();

        let color = self.session.color();
        let mut rgb = Color32::from_rgb(color.r, color.g, color.b);
        let mut alpha = color.alpha;
        ui.horizontal(|ui| {
            ui.label("Color:");
            egui::color_picker::color_edit_button_srgba(
                ui,
                &mut rgb,
                egui::color_picker::Alpha::Opaque,
            );
        });
        ui.horizontal(|ui| {
            ui.label("Opacity:");
            ui.add(egui::Slider::new(&mut alpha, 0.0..=1.0));
        });
        let updated = PaintColor::new(rgb.r(), rgb.g(), rgb.b(), alpha);
        if updated != color {
            self.session.set_color(updated);
        }
        ui.label(updated.to_hex());

        let mut erase_fill = self.session.erase_fill();
        if ui.checkbox(&mut erase_fill, "Fill erases").changed() {
            self.session.set_erase_fill(erase_fill);
        }

        let mut show_grid = self.renderer.show_grid();
        if ui.checkbox(&mut show_grid, "Grid").changed() {
            self.renderer.set_show_grid(show_grid);
            self.settings.config.show_grid = show_grid;
        }

        if let Some(picked) = &self.feedback.borrow().picked {
            ui.separator();
            match picked {
                Some(hex) => ui.label(format!("Picked {}", hex)),
                None => ui.label("Picked nothing (transparent)"),
            };
        }
    }

    fn canvas(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let size = self.renderer.canvas_size(self.session.display_buffer());
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());

        let cell_size = self.renderer.scale() as f32;
        for event in self.input.process_input(ctx, &response, cell_size) {
            self.session.handle_input(event);
        }

        let rect = response.rect;
        let buffer = self.session.display_buffer();
        self.renderer.paint(ctx, &painter, rect, buffer);
        if let Some(pos) = response.hover_pos() {
            let cell = self.renderer.cell_at(rect, pos);
            self.renderer.paint_hover(&painter, rect, cell, buffer);
        }
    }
}

impl eframe::App for PixelEditorApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.settings);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("history_bar").show(ctx, |ui| self.top_bar(ui));
        egui::SidePanel::left("tools_panel").show(ctx, |ui| self.tools_panel(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| self.canvas(ctx, ui));
        });
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_store() -> Box<dyn KeyValueStore> {
    Box::new(crate::store::FileStore::new("textures"))
}

#[cfg(target_arch = "wasm32")]
fn default_store() -> Box<dyn KeyValueStore> {
    Box::new(crate::store::MemoryStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{GridPos, InputEvent};
    use crate::pixel_buffer::PixelBuffer;
    use crate::store::{self, MemoryStore};

    #[test]
    fn test_feedback_tracks_history_flags() {
        let mut app =
            PixelEditorApp::with_store(AppSettings::default(), Box::new(MemoryStore::new())).unwrap();
        app.session.set_color(PaintColor::opaque(0, 0, 255));
        app.session.handle_input(InputEvent::PointerDown(GridPos::new(3, 3)));
        app.session.handle_input(InputEvent::PointerUp(GridPos::new(3, 3)));
        assert!(app.feedback.borrow().can_undo);
        assert_eq!(app.feedback.borrow().commits, 1);

        app.session.undo();
        assert!(!app.feedback.borrow().can_undo);
        assert!(app.feedback.borrow().can_redo);
    }

    #[test]
    fn test_switching_face_saves_and_restores() {
        let mut app =
            PixelEditorApp::with_store(AppSettings::default(), Box::new(MemoryStore::new())).unwrap();
        app.session.handle_input(InputEvent::PointerDown(GridPos::new(0, 0)));
        app.session.handle_input(InputEvent::PointerUp(GridPos::new(0, 0)));

        app.switch_face(FaceId::Up);
        assert_eq!(app.session.face(), FaceId::Up);
        assert!(app.session.current().is_transparent(0, 0));

        app.switch_face(FaceId::North);
        assert!(!app.session.current().is_transparent(0, 0));
    }

    #[test]
    fn test_switching_unedited_face_saves_nothing() {
        let mut app =
            PixelEditorApp::with_store(AppSettings::default(), Box::new(MemoryStore::new())).unwrap();
        app.switch_face(FaceId::Up);
        app.switch_face(FaceId::West);
        assert_eq!(app.session.face(), FaceId::West);

        let saved = store::saved_faces(app.store.as_ref(), app.settings.texture).unwrap();
        assert!(saved.is_empty());
        assert!(app.status.is_empty());
    }

    #[test]
    fn test_export_writes_decodable_png() {
        let mut app =
            PixelEditorApp::with_store(AppSettings::default(), Box::new(MemoryStore::new())).unwrap();
        app.session.set_color(PaintColor::opaque(200, 10, 10));
        app.session.handle_input(InputEvent::PointerDown(GridPos::new(5, 6)));
        app.session.handle_input(InputEvent::PointerUp(GridPos::new(5, 6)));

        let path = std::env::temp_dir().join(format!("texture_painter_{}.png", Uuid::new_v4()));
        app.export(&path);
        let bytes = std::fs::read(&path);
        let _ = std::fs::remove_file(&path);

        let decoded = PixelBuffer::decode(&bytes.unwrap(), 24, 24).unwrap();
        assert_eq!(decoded, *app.session.current());
        assert!(app.status.starts_with("Exported"));
    }
}

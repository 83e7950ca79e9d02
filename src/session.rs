use std::sync::Arc;

use uuid::Uuid;

use crate::color::{Color, PaintColor};
use crate::config::EditorConfig;
use crate::dispatcher::{Dispatch, ToolDispatcher};
use crate::error::{EditorError, EditorResult};
use crate::event::{EditorEvent, EventBus, EventHandler};
use crate::face::FaceId;
use crate::history::{HistoryStack, HistoryState};
use crate::input::InputEvent;
use crate::pixel_buffer::{PixelBuffer, PixelSource, Snapshot};
use crate::store::{self, KeyValueStore, PersistenceResult};
use crate::tools::{Brush, Tool};

/// Undo/redo control handed to whatever hosts the editor
pub trait HistoryControl {
    /// Steps back one entry; `false` if nothing was undone
    fn undo(&mut self) -> bool;

    /// Steps forward one entry; `false` if nothing was redone
    fn redo(&mut self) -> bool;

    fn history_state(&self) -> HistoryState;
}

/// Editing state for one block face: its history, the tool dispatcher and the
/// listeners to notify when the texture changes.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    face: FaceId,
    history: HistoryStack,
    /// Mirrors `history.current()`
    head: Snapshot,
    dispatcher: ToolDispatcher,
    event_bus: EventBus,
}

impl EditorSession {
    /// Opens a session on `face`. Unreadable sources start blank.
    pub fn open(config: EditorConfig, face: FaceId, source: &PixelSource) -> EditorResult<Self> {
        config
            .validate()
            .map_err(|e| EditorError::InvalidConfig(e.to_string()))?;
        let initial = PixelBuffer::from_source(source, config.width, config.height)?.snapshot();

        let mut history = HistoryStack::new(config.max_history);
        history.reset(initial.clone());

        let brush = Brush {
            opacity_aware: config.opacity_aware_pencil,
            ..Default::default()
        };
        let dispatcher = ToolDispatcher::new(brush, config.pick_modifier);

        log::debug!("Opened {}x{} session on {}", config.width, config.height, face);
        Ok(Self {
            config,
            face,
            history,
            head: initial,
            dispatcher,
            event_bus: EventBus::new(),
        })
    }

    /// Opens a session on a face previously saved to `store`
    pub fn open_saved(
        config: EditorConfig,
        store: &dyn KeyValueStore,
        texture: Uuid,
        face: FaceId,
    ) -> EditorResult<Self> {
        let source = saved_source(store, texture, face);
        Self::open(config, face, &source)
    }

    /// Switches to another face, dropping the gesture in progress and all history
    pub fn select_face(&mut self, face: FaceId, source: &PixelSource) -> EditorResult<()> {
        let initial =
            PixelBuffer::from_source(source, self.config.width, self.config.height)?.snapshot();
        // Uncommitted edits belong to the old face
        self.dispatcher.finish_gesture(&mut Vec::new());
        self.face = face;
        self.history.reset(initial.clone());
        self.head = initial;
        log::debug!("Switched session to {}", face);
        self.emit_history_state();
        Ok(())
    }

    /// Registers a listener. It immediately receives the current undo/redo flags.
    pub fn subscribe(&self, mut handler: Box<dyn EventHandler>) {
        handler.handle_event(&EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
        self.event_bus.subscribe(handler);
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        let dispatches = self.dispatcher.handle(event, &self.head);
        self.apply(dispatches);
    }

    pub fn set_tool(&mut self, tool: Tool) {
        let dispatches = self.dispatcher.set_tool(tool);
        self.apply(dispatches);
    }

    /// The tool chosen by the user
    pub fn tool(&self) -> Tool {
        self.dispatcher.selected_tool()
    }

    /// The tool a pointer-down would use, accounting for the pick modifier
    pub fn effective_tool(&self) -> Tool {
        self.dispatcher.effective_tool()
    }

    pub fn color(&self) -> PaintColor {
        self.dispatcher.brush().color
    }

    pub fn set_color(&mut self, color: PaintColor) {
        self.dispatcher.brush_mut().color = color;
    }

    pub fn erase_fill(&self) -> bool {
        self.dispatcher.brush().erase_fill
    }

    pub fn set_erase_fill(&mut self, erase_fill: bool) {
        self.dispatcher.brush_mut().erase_fill = erase_fill;
    }

    pub fn is_drawing(&self) -> bool {
        self.dispatcher.is_drawing()
    }

    pub fn face(&self) -> FaceId {
        self.face
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The committed texture
    pub fn current(&self) -> Snapshot {
        self.head.clone()
    }

    /// What the canvas should show: the gesture in progress, else the committed texture.
    /// Listeners only ever see committed buffers.
    pub fn display_buffer(&self) -> &PixelBuffer {
        self.dispatcher.working_buffer().unwrap_or(self.head.as_ref())
    }

    /// Saves the committed texture under `texture`
    pub fn save(&self, store: &dyn KeyValueStore, texture: Uuid) -> PersistenceResult<()> {
        store::save_texture(store, texture, self.face, &self.head)?;
        log::debug!("Saved {} of texture {}", self.face, texture);
        Ok(())
    }

    /// The committed texture as PNG bytes
    pub fn export_png(&self) -> PersistenceResult<Vec<u8>> {
        Ok(self.head.encode_png()?)
    }

    fn apply(&mut self, dispatches: Vec<Dispatch>) {
        for dispatch in dispatches {
            match dispatch {
                Dispatch::Commit(buffer) => self.commit(buffer),
                Dispatch::Picked(color) => {
                    self.event_bus
                        .emit(EditorEvent::ColorPicked(color.map(Color::to_hex)));
                }
                Dispatch::ToolChanged { old, new } => {
                    self.event_bus.emit(EditorEvent::ToolChanged { old, new });
                }
            }
        }
    }

    fn commit(&mut self, buffer: PixelBuffer) {
        let snapshot = Arc::new(buffer);
        if !self.history.push(snapshot.clone()) {
            return;
        }
        self.head = snapshot;
        log::debug!(
            "Committed {} edit ({} of {} entries)",
            self.face,
            self.history.state().index + 1,
            self.history.len()
        );
        self.emit_texture_applied();
    }

    /// Ends any gesture before moving through history
    fn settle(&mut self) {
        let mut dispatches = Vec::new();
        self.dispatcher.finish_gesture(&mut dispatches);
        self.apply(dispatches);
    }

    fn emit_texture_applied(&self) {
        self.event_bus.emit(EditorEvent::TextureApplied {
            face: self.face,
            buffer: self.head.clone(),
        });
        self.emit_history_state();
    }

    fn emit_history_state(&self) {
        self.event_bus.emit(EditorEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }
}

impl HistoryControl for EditorSession {
    fn undo(&mut self) -> bool {
        self.settle();
        match self.history.undo() {
            Some(snapshot) => {
                self.head = snapshot;
                log::debug!("Undo on {}", self.face);
                self.emit_texture_applied();
                true
            }
            None => false,
        }
    }

    fn redo(&mut self) -> bool {
        self.settle();
        match self.history.redo() {
            Some(snapshot) => {
                self.head = snapshot;
                log::debug!("Redo on {}", self.face);
                self.emit_texture_applied();
                true
            }
            None => false,
        }
    }

    fn history_state(&self) -> HistoryState {
        self.history.state()
    }
}

/// Resolves the saved pixels of a face, treating unreadable records as missing
pub fn saved_source(store: &dyn KeyValueStore, texture: Uuid, face: FaceId) -> PixelSource {
    match store::load_texture(store, texture, face) {
        Ok(Some(record)) => PixelSource::Rgba(record.pixels),
        Ok(None) => PixelSource::Blank,
        Err(err) => {
            log::warn!("Could not load {} of texture {}: {}", face, texture, err);
            PixelSource::Blank
        }
    }
}

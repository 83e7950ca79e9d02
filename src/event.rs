use std::cell::RefCell;

use crate::face::FaceId;
use crate::pixel_buffer::Snapshot;
use crate::tools::Tool;

/// Notifications emitted by an editing session
#[derive(Debug, Clone)]
pub enum EditorEvent {
    /// A buffer became current: after a commit, undo or redo
    TextureApplied { face: FaceId, buffer: Snapshot },
    /// Undo/redo availability after any history change
    HistoryChanged { can_undo: bool, can_redo: bool },
    /// Eyedropper result: `#rrggbb`, or `None` for a transparent sample
    ColorPicked(Option<String>),
    /// The effective tool changed (including temporary eyedropper switches)
    ToolChanged { old: Tool, new: Tool },
}

/// Receives editor events
pub trait EventHandler {
    fn handle_event(&mut self, event: &EditorEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&EditorEvent),
{
    fn handle_event(&mut self, event: &EditorEvent) {
        self(event)
    }
}

/// A simple event bus for broadcasting editor events to registered handlers
pub struct EventBus {
    handlers: RefCell<Vec<Box<dyn EventHandler>>>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &format!("<{} handlers>", self.handlers.borrow().len()))
            .finish()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(Vec::new()),
        }
    }

    /// Subscribe a handler to receive events
    pub fn subscribe(&self, handler: Box<dyn EventHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    /// Emit an event to all registered handlers
    pub fn emit(&self, event: EditorEvent) {
        for handler in &mut *self.handlers.borrow_mut() {
            handler.handle_event(&event);
        }
    }
}

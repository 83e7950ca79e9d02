use crate::color::Color;
use crate::config::PickModifier;
use crate::input::{GridPos, InputEvent};
use crate::pixel_buffer::{PixelBuffer, Snapshot};
use crate::state::{EditorState, Gesture};
use crate::tools::{self, Brush, Tool, ToolOutcome};

/// Something the session has to act on after dispatching input
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// A finished edit that should become a history entry
    Commit(PixelBuffer),
    /// Eyedropper result; `None` for a transparent sample
    Picked(Option<Color>),
    ToolChanged { old: Tool, new: Tool },
}

/// Turns pointer gestures into buffer edits for the selected tool.
///
/// Idle until a pointer-down inside the grid, then Drawing until pointer-up or
/// pointer-leave. The eyedropper never enters Drawing.
#[derive(Debug)]
pub struct ToolDispatcher {
    state: EditorState,
    selected: Tool,
    /// Set while the pick modifier is held
    temporary: Option<Tool>,
    brush: Brush,
    pick_modifier: PickModifier,
}

impl ToolDispatcher {
    pub fn new(brush: Brush, pick_modifier: PickModifier) -> Self {
        Self {
            state: EditorState::Idle,
            selected: Tool::default(),
            temporary: None,
            brush,
            pick_modifier,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing()
    }

    pub fn selected_tool(&self) -> Tool {
        self.selected
    }

    /// The tool pointer-down would use right now
    pub fn effective_tool(&self) -> Tool {
        self.temporary.unwrap_or(self.selected)
    }

    pub fn brush(&self) -> &Brush {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut Brush {
        &mut self.brush
    }

    /// The uncommitted buffer of the gesture in progress
    pub fn working_buffer(&self) -> Option<&PixelBuffer> {
        self.state.gesture().map(Gesture::working)
    }

    /// Selects a tool, finishing any gesture in progress first
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Dispatch> {
        let mut out = Vec::new();
        self.finish_gesture(&mut out);
        let old = self.effective_tool();
        self.selected = tool;
        self.push_tool_change(old, &mut out);
        out
    }

    pub fn handle(&mut self, event: InputEvent, head: &Snapshot) -> Vec<Dispatch> {
        let mut out = Vec::new();
        match event {
            InputEvent::PointerDown(pos) => {
                // A down without a matching up still closes the old gesture
                self.finish_gesture(&mut out);
                self.pointer_down(pos, head, &mut out);
            }
            InputEvent::PointerMove(pos) => self.pointer_move(pos),
            InputEvent::PointerUp(_) | InputEvent::PointerLeave => self.finish_gesture(&mut out),
            InputEvent::ModifiersChanged(modifiers) => {
                let old = self.effective_tool();
                self.temporary = self
                    .pick_modifier
                    .is_held(modifiers)
                    .then_some(Tool::Eyedropper);
                self.push_tool_change(old, &mut out);
            }
        }
        out
    }

    /// Commits or discards the gesture in progress
    pub fn finish_gesture(&mut self, out: &mut Vec<Dispatch>) {
        if let Some(gesture) = self.state.take_gesture() {
            let tool = gesture.tool();
            match gesture.finish() {
                Some(buffer) => {
                    log::debug!("{} gesture finished with changes", tool.name());
                    out.push(Dispatch::Commit(buffer));
                }
                None => log::trace!("{} gesture finished without changes", tool.name()),
            }
        }
    }

    fn pointer_down(&mut self, pos: GridPos, head: &Snapshot, out: &mut Vec<Dispatch>) {
        if !head.contains(pos.x, pos.y) {
            log::trace!("Ignoring pointer-down outside the grid at {:?}", pos);
            return;
        }

        let tool = self.effective_tool();
        if !tool.starts_gesture() {
            if let Ok(picked) = tools::sample(head, pos) {
                if let Some(color) = picked {
                    self.brush.color = self.brush.color.with_rgb(color);
                }
                out.push(Dispatch::Picked(picked));
            }
            return;
        }

        let mut gesture = Gesture::begin(tool, head.clone());
        match tool.apply(gesture.working_mut(), pos, &self.brush) {
            Ok(ToolOutcome::Painted(true)) if tool == Tool::Fill => {
                // Fills commit on pointer-down rather than waiting for pointer-up
                out.push(Dispatch::Commit(gesture.working().clone()));
                gesture.rebase();
            }
            Ok(_) => {}
            Err(err) => log::trace!("{} ignored: {}", tool.name(), err),
        }
        self.state = EditorState::Drawing(gesture);
    }

    fn pointer_move(&mut self, pos: GridPos) {
        let brush = self.brush;
        let Some(gesture) = self.state.gesture_mut() else {
            return;
        };
        let tool = gesture.tool();
        if !tool.paints_on_move() {
            return;
        }
        if let Err(err) = tool.apply(gesture.working_mut(), pos, &brush) {
            log::trace!("{} ignored: {}", tool.name(), err);
        }
    }

    fn push_tool_change(&self, old: Tool, out: &mut Vec<Dispatch>) {
        let new = self.effective_tool();
        if old != new {
            out.push(Dispatch::ToolChanged { old, new });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::PaintColor;

    fn head() -> Snapshot {
        PixelBuffer::blank(4, 4).unwrap().snapshot()
    }

    fn dispatcher() -> ToolDispatcher {
        let brush = Brush {
            color: PaintColor::opaque(255, 0, 0),
            ..Default::default()
        };
        ToolDispatcher::new(brush, PickModifier::Alt)
    }

    #[test]
    fn test_pencil_drag_commits_once_on_pointer_up() {
        let mut dispatcher = dispatcher();
        let head = head();
        assert!(dispatcher.handle(InputEvent::PointerDown(GridPos::new(0, 0)), &head).is_empty());
        assert!(dispatcher.is_drawing());
        dispatcher.handle(InputEvent::PointerMove(GridPos::new(1, 0)), &head);
        dispatcher.handle(InputEvent::PointerMove(GridPos::new(9, 9)), &head);

        let out = dispatcher.handle(InputEvent::PointerUp(GridPos::new(1, 0)), &head);
        assert!(!dispatcher.is_drawing());
        match out.as_slice() {
            [Dispatch::Commit(buffer)] => {
                assert_eq!(buffer.get(0, 0).unwrap(), Color::rgb(255, 0, 0));
                assert_eq!(buffer.get(1, 0).unwrap(), Color::rgb(255, 0, 0));
                assert!(buffer.is_transparent(2, 0));
            }
            other => panic!("unexpected dispatch: {:?}", other),
        }
    }

    #[test]
    fn test_pointer_down_outside_grid_stays_idle() {
        let mut dispatcher = dispatcher();
        let out = dispatcher.handle(InputEvent::PointerDown(GridPos::new(-1, 2)), &head());
        assert!(out.is_empty());
        assert!(!dispatcher.is_drawing());
    }

    #[test]
    fn test_fill_commits_on_pointer_down_and_ignores_moves() {
        let mut dispatcher = dispatcher();
        dispatcher.set_tool(Tool::Fill);
        let head = head();
        let out = dispatcher.handle(InputEvent::PointerDown(GridPos::new(2, 2)), &head);
        assert!(matches!(out.as_slice(), [Dispatch::Commit(_)]));
        assert!(dispatcher.is_drawing());

        dispatcher.handle(InputEvent::PointerMove(GridPos::new(3, 3)), &head);
        let out = dispatcher.handle(InputEvent::PointerLeave, &head);
        assert!(out.is_empty());
    }

    #[test]
    fn test_modifier_switches_to_eyedropper_temporarily() {
        let mut dispatcher = dispatcher();
        dispatcher.set_tool(Tool::Eraser);
        let alt = egui::Modifiers { alt: true, ..Default::default() };

        let out = dispatcher.handle(InputEvent::ModifiersChanged(alt), &head());
        assert_eq!(
            out,
            vec![Dispatch::ToolChanged { old: Tool::Eraser, new: Tool::Eyedropper }]
        );
        assert_eq!(dispatcher.selected_tool(), Tool::Eraser);

        let out = dispatcher.handle(InputEvent::ModifiersChanged(egui::Modifiers::NONE), &head());
        assert_eq!(
            out,
            vec![Dispatch::ToolChanged { old: Tool::Eyedropper, new: Tool::Eraser }]
        );
    }

    #[test]
    fn test_modifier_pressed_mid_stroke_keeps_painting() {
        let mut dispatcher = dispatcher();
        let head = head();
        let alt = egui::Modifiers { alt: true, ..Default::default() };
        dispatcher.handle(InputEvent::PointerDown(GridPos::new(0, 0)), &head);

        let out = dispatcher.handle(InputEvent::ModifiersChanged(alt), &head);
        assert_eq!(
            out,
            vec![Dispatch::ToolChanged { old: Tool::Pencil, new: Tool::Eyedropper }]
        );
        assert!(dispatcher.is_drawing());
        dispatcher.handle(InputEvent::PointerMove(GridPos::new(1, 0)), &head);

        let out = dispatcher.handle(InputEvent::PointerUp(GridPos::new(1, 0)), &head);
        match out.as_slice() {
            [Dispatch::Commit(buffer)] => {
                assert_eq!(buffer.get(1, 0).unwrap(), Color::rgb(255, 0, 0));
            }
            other => panic!("unexpected dispatch: {:?}", other),
        }
        assert_eq!(dispatcher.effective_tool(), Tool::Eyedropper);
    }

    #[test]
    fn test_switching_tool_mid_gesture_commits_it() {
        let mut dispatcher = dispatcher();
        let head = head();
        dispatcher.handle(InputEvent::PointerDown(GridPos::new(0, 0)), &head);
        let out = dispatcher.set_tool(Tool::Fill);
        assert!(matches!(out[0], Dispatch::Commit(_)));
        assert_eq!(out[1], Dispatch::ToolChanged { old: Tool::Pencil, new: Tool::Fill });
    }
}

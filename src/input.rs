use egui::{Modifiers, Pos2, Rect, Response};

/// Integer cell coordinates; may lie outside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Pointer and modifier input in grid coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(GridPos),
    PointerMove(GridPos),
    PointerUp(GridPos),
    /// Pointer left the canvas; ends a gesture like pointer-up
    PointerLeave,
    /// The set of held modifier keys changed
    ModifiersChanged(Modifiers),
}

/// Maps a screen position to the cell under it. `cell_size` is the on-screen size of one cell.
pub fn cell_at(canvas: Rect, cell_size: f32, pos: Pos2) -> GridPos {
    let local = pos - canvas.min;
    GridPos::new(
        (local.x / cell_size).floor() as i32,
        (local.y / cell_size).floor() as i32,
    )
}

/// Converts raw egui input over the canvas into [`InputEvent`]s
#[derive(Debug, Default)]
pub struct InputHandler {
    last_cell: Option<GridPos>,
    pointer_inside: bool,
    modifiers: Modifiers,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one frame of input for the canvas `response`
    pub fn process_input(&mut self, ctx: &egui::Context, response: &Response, cell_size: f32) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let canvas = response.rect;

        let (modifiers, pressed, released, down) = ctx.input(|input| {
            (
                input.modifiers,
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.primary_down(),
            )
        });

        if modifiers != self.modifiers {
            self.modifiers = modifiers;
            events.push(InputEvent::ModifiersChanged(modifiers));
        }

        let hover = response.hover_pos();
        match hover {
            Some(pos) => {
                let cell = cell_at(canvas, cell_size, pos);
                self.pointer_inside = true;
                if pressed {
                    events.push(InputEvent::PointerDown(cell));
                } else if down && Some(cell) != self.last_cell {
                    events.push(InputEvent::PointerMove(cell));
                }
                if released {
                    events.push(InputEvent::PointerUp(cell));
                }
                self.last_cell = Some(cell);
            }
            None => {
                if self.pointer_inside {
                    events.push(InputEvent::PointerLeave);
                }
                self.pointer_inside = false;
                self.last_cell = None;
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    #[test]
    fn test_cell_at_floors_toward_negative() {
        let canvas = Rect::from_min_size(pos2(100.0, 50.0), vec2(240.0, 240.0));
        assert_eq!(cell_at(canvas, 10.0, pos2(100.0, 50.0)), GridPos::new(0, 0));
        assert_eq!(cell_at(canvas, 10.0, pos2(339.9, 289.9)), GridPos::new(23, 23));
        assert_eq!(cell_at(canvas, 10.0, pos2(99.0, 50.0)), GridPos::new(-1, 0));
        assert_eq!(cell_at(canvas, 10.0, pos2(340.0, 60.0)), GridPos::new(24, 1));
    }
}

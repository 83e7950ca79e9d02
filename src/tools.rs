use serde::{Deserialize, Serialize};

use crate::color::{Color, PaintColor};
use crate::error::EditorResult;
use crate::flood_fill::fill_region;
use crate::input::GridPos;
use crate::pixel_buffer::PixelBuffer;

/// The operation a pointer gesture performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    Fill,
    Eyedropper,
}

/// Paint settings shared by the tools
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: PaintColor,
    /// Pencil writes the selected opacity instead of forcing it opaque
    pub opacity_aware: bool,
    /// Fill paints transparent instead of the selected color
    pub erase_fill: bool,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: PaintColor::default(),
            opacity_aware: false,
            erase_fill: false,
        }
    }
}

impl Brush {
    /// The pixel the pencil writes
    pub fn pencil_pixel(&self) -> Color {
        if self.opacity_aware {
            self.color.to_pixel()
        } else {
            self.color.to_opaque_pixel()
        }
    }

    /// The pixel the fill tool spreads
    pub fn fill_pixel(&self) -> Color {
        if self.erase_fill {
            Color::TRANSPARENT
        } else {
            self.color.to_pixel()
        }
    }
}

/// What applying a tool at one cell did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    /// The buffer was written; `true` if any byte changed
    Painted(bool),
    /// The eyedropper sampled a pixel; `None` if it was transparent
    Picked(Option<Color>),
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Pencil, Tool::Eraser, Tool::Fill, Tool::Eyedropper];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Pencil => "Pencil",
            Tool::Eraser => "Eraser",
            Tool::Fill => "Fill",
            Tool::Eyedropper => "Eyedropper",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tool::Pencil => "✏",
            Tool::Eraser => "⌫",
            Tool::Fill => "🪣",
            Tool::Eyedropper => "💧",
        }
    }

    /// Whether pointer-down starts a gesture that lasts until pointer-up
    pub fn starts_gesture(self) -> bool {
        !matches!(self, Tool::Eyedropper)
    }

    /// Whether pointer-move during a gesture applies the tool again
    pub fn paints_on_move(self) -> bool {
        matches!(self, Tool::Pencil | Tool::Eraser)
    }

    /// Applies the tool at `pos`. Off-grid positions return `OutOfBounds`.
    pub fn apply(self, buffer: &mut PixelBuffer, pos: GridPos, brush: &Brush) -> EditorResult<ToolOutcome> {
        match self {
            Tool::Pencil => write_pixel(buffer, pos, brush.pencil_pixel()),
            Tool::Eraser => write_pixel(buffer, pos, Color::TRANSPARENT),
            Tool::Fill => {
                // Surface the bounds error before filling
                buffer.get(pos.x, pos.y)?;
                Ok(ToolOutcome::Painted(fill_region(buffer, pos.x, pos.y, brush.fill_pixel())))
            }
            Tool::Eyedropper => Ok(ToolOutcome::Picked(sample(buffer, pos)?)),
        }
    }
}

/// Reads the pixel at `pos` for the eyedropper; transparent pixels yield `None`
pub fn sample(buffer: &PixelBuffer, pos: GridPos) -> EditorResult<Option<Color>> {
    let color = buffer.get(pos.x, pos.y)?;
    Ok((!color.is_transparent()).then_some(color))
}

fn write_pixel(buffer: &mut PixelBuffer, pos: GridPos, color: Color) -> EditorResult<ToolOutcome> {
    let before = buffer.get(pos.x, pos.y)?;
    buffer.set(pos.x, pos.y, color)?;
    Ok(ToolOutcome::Painted(before != color))
}

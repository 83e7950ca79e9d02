use egui::{Color32, ColorImage, Context, Painter, Rect, TextureHandle, TextureOptions, Vec2};

use crate::config::EditorConfig;
use crate::input::{self, GridPos};
use crate::pixel_buffer::PixelBuffer;

/// Draws a pixel buffer magnified over a checkerboard with a grid overlay
pub struct Renderer {
    scale: usize,
    show_grid: bool,
    checker_light: Color32,
    checker_dark: Color32,
    grid_color: Color32,
    texture: Option<TextureHandle>,
    /// Bytes last uploaded to `texture`
    uploaded: Vec<u8>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("scale", &self.scale)
            .field("show_grid", &self.show_grid)
            .field("texture", &self.texture.as_ref().map(|_| "<texture>"))
            .finish()
    }
}

fn rgb(c: [u8; 3]) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

impl Renderer {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            scale: config.scale.max(1),
            show_grid: config.show_grid,
            checker_light: rgb(config.checker_light),
            checker_dark: rgb(config.checker_dark),
            grid_color: rgb(config.grid_color),
            texture: None,
            uploaded: Vec::new(),
        }
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn set_show_grid(&mut self, show_grid: bool) {
        if self.show_grid != show_grid {
            self.show_grid = show_grid;
            self.uploaded.clear();
        }
    }

    /// On-screen size of the magnified buffer
    pub fn canvas_size(&self, buffer: &PixelBuffer) -> Vec2 {
        egui::vec2(
            (buffer.width() * self.scale) as f32,
            (buffer.height() * self.scale) as f32,
        )
    }

    /// The cell under a screen position on a canvas drawn at `rect`
    pub fn cell_at(&self, rect: Rect, pos: egui::Pos2) -> GridPos {
        input::cell_at(rect, self.scale as f32, pos)
    }

    /// Rasterizes the buffer at `scale` screen pixels per cell
    pub fn compose(&self, buffer: &PixelBuffer) -> ColorImage {
        let scale = self.scale;
        let width = buffer.width() * scale;
        let height = buffer.height() * scale;
        let checker = (scale / 2).max(1);
        // Grid lines would swallow tiny cells entirely
        let grid = self.show_grid && scale >= 4;

        let mut image = ColorImage::new([width, height], Color32::TRANSPARENT);
        for py in 0..height {
            for px in 0..width {
                let out = if grid && (px % scale == 0 || py % scale == 0) {
                    self.grid_color
                } else {
                    let background = if (px / checker + py / checker) % 2 == 0 {
                        self.checker_light
                    } else {
                        self.checker_dark
                    };
                    buffer
                        .get((px / scale) as i32, (py / scale) as i32)
                        .map(|color| color.over(background))
                        .unwrap_or(background)
                };
                image.pixels[py * width + px] = out;
            }
        }
        image
    }

    /// Draws `buffer` into `rect`, re-uploading the texture only when pixels changed
    pub fn paint(&mut self, ctx: &Context, painter: &Painter, rect: Rect, buffer: &PixelBuffer) {
        if self.texture.is_none() || self.uploaded.as_slice() != buffer.as_bytes() {
            let image = self.compose(buffer);
            match &mut self.texture {
                Some(texture) => texture.set(image, TextureOptions::NEAREST),
                None => {
                    self.texture =
                        Some(ctx.load_texture("pixel_canvas", image, TextureOptions::NEAREST));
                }
            }
            self.uploaded = buffer.as_bytes().to_vec();
        }

        if let Some(texture) = &self.texture {
            painter.image(
                texture.id(),
                rect,
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }
    }

    /// Outlines the hovered cell
    pub fn paint_hover(&self, painter: &Painter, rect: Rect, cell: GridPos, buffer: &PixelBuffer) {
        if !buffer.contains(cell.x, cell.y) {
            return;
        }
        let size = self.scale as f32;
        let min = rect.min + egui::vec2(cell.x as f32 * size, cell.y as f32 * size);
        painter.rect_stroke(
            Rect::from_min_size(min, egui::vec2(size, size)),
            0.0,
            egui::Stroke::new(1.0, Color32::WHITE),
        );
    }
}

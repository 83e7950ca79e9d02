use egui::Color32;
use serde::{Deserialize, Serialize};

/// A single stored pixel, straight (unpremultiplied) RGBA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// `#rrggbb`, alpha ignored
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha-blends this color over an opaque background
    pub fn over(self, background: Color32) -> Color32 {
        let alpha = self.a as u32;
        let mix = |fg: u8, bg: u8| -> u8 {
            ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8
        };
        Color32::from_rgb(
            mix(self.r, background.r()),
            mix(self.g, background.g()),
            mix(self.b, background.b()),
        )
    }
}

/// The color selected in the UI. Alpha is a 0..=1 opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaintColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f32,
}

impl Default for PaintColor {
    fn default() -> Self {
        Self::opaque(0, 0, 0)
    }
}

impl PaintColor {
    pub const fn new(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self { r, g, b, alpha }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Opacity as a stored alpha byte: clamped to 0..=1, scaled, rounded half away from zero
    pub fn alpha_byte(&self) -> u8 {
        let alpha = if self.alpha.is_nan() { 0.0 } else { self.alpha.clamp(0.0, 1.0) };
        (alpha * 255.0).round() as u8
    }

    /// The pixel this color paints, keeping its opacity
    pub fn to_pixel(&self) -> Color {
        Color::rgba(self.r, self.g, self.b, self.alpha_byte())
    }

    /// The pixel this color paints with opacity forced to full
    pub fn to_opaque_pixel(&self) -> Color {
        Color::rgb(self.r, self.g, self.b)
    }

    pub fn with_rgb(self, rgb: Color) -> Self {
        Self {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
            alpha: self.alpha,
        }
    }

    pub fn to_hex(&self) -> String {
        self.to_opaque_pixel().to_hex()
    }
}

use std::io::Cursor;
use std::sync::Arc;

use image::{imageops::FilterType, ImageFormat, RgbaImage};

use crate::color::Color;
use crate::error::{EditorError, EditorResult};

/// Immutable committed copy of a buffer
pub type Snapshot = Arc<PixelBuffer>;

/// Where the initial pixels of an editing session come from
#[derive(Debug, Clone, Default)]
pub enum PixelSource {
    /// No existing texture, start transparent
    #[default]
    Blank,
    /// Raw row-major RGBA bytes at the session's dimensions
    Rgba(Vec<u8>),
    /// An encoded image (PNG)
    Encoded(Vec<u8>),
}

/// Fixed-size grid of RGBA pixels stored row-major, four bytes per pixel
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data", &format!("<{} bytes>", self.data.len()))
            .finish()
    }
}

impl PixelBuffer {
    /// A fully transparent buffer
    pub fn blank(width: usize, height: usize) -> EditorResult<Self> {
        Self::check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; width * height * 4],
        })
    }

    /// A buffer with every pixel set to `color`
    pub fn filled(width: usize, height: usize, color: Color) -> EditorResult<Self> {
        Self::check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            data: color.to_array().repeat(width * height),
        })
    }

    /// Wraps raw RGBA bytes; the length must be exactly `width * height * 4`
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> EditorResult<Self> {
        Self::check_dimensions(width, height)?;
        let expected = width * height * 4;
        if data.len() != expected {
            return Err(EditorError::InvalidDimensions(format!(
                "expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Decodes an encoded image, resampling with nearest-neighbour when its size differs
    pub fn decode(bytes: &[u8], width: usize, height: usize) -> EditorResult<Self> {
        Self::check_dimensions(width, height)?;
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| EditorError::SourceUnavailable(e.to_string()))?;
        let mut rgba = decoded.to_rgba8();
        if rgba.width() as usize != width || rgba.height() as usize != height {
            log::debug!(
                "Resampling {}x{} texture to {}x{}",
                rgba.width(),
                rgba.height(),
                width,
                height
            );
            rgba = image::imageops::resize(&rgba, width as u32, height as u32, FilterType::Nearest);
        }
        Self::from_rgba(width, height, rgba.into_raw())
    }

    /// Resolves a session source. Unreadable sources fall back to a blank buffer.
    pub fn from_source(source: &PixelSource, width: usize, height: usize) -> EditorResult<Self> {
        let loaded = match source {
            PixelSource::Blank => return Self::blank(width, height),
            PixelSource::Rgba(bytes) => Self::from_rgba(width, height, bytes.clone())
                .map_err(|e| EditorError::SourceUnavailable(e.to_string())),
            PixelSource::Encoded(bytes) => Self::decode(bytes, width, height),
        };

        match loaded {
            Ok(buffer) => Ok(buffer),
            Err(err) => {
                log::warn!("Falling back to a blank texture: {}", err);
                Self::blank(width, height)
            }
        }
    }

    /// Encodes the buffer as PNG
    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let image = RgbaImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .ok_or_else(|| {
                image::ImageError::Parameter(image::error::ParameterError::from_kind(
                    image::error::ParameterErrorKind::DimensionMismatch,
                ))
            })?;
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    fn check_dimensions(width: usize, height: usize) -> EditorResult<()> {
        if width == 0 || height == 0 {
            return Err(EditorError::InvalidDimensions(format!(
                "{}x{} has no pixels",
                width, height
            )));
        }
        match width.checked_mul(height).and_then(|n| n.checked_mul(4)) {
            Some(_) => Ok(()),
            None => Err(EditorError::InvalidDimensions(format!(
                "{}x{} overflows the pixel store",
                width, height
            ))),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn offset(&self, x: i32, y: i32) -> EditorResult<usize> {
        if !self.contains(x, y) {
            return Err(EditorError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y as usize * self.width + x as usize) * 4)
    }

    pub fn get(&self, x: i32, y: i32) -> EditorResult<Color> {
        let i = self.offset(x, y)?;
        Ok(Color::rgba(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    pub fn set(&mut self, x: i32, y: i32, color: Color) -> EditorResult<()> {
        let i = self.offset(x, y)?;
        self.data[i..i + 4].copy_from_slice(&color.to_array());
        Ok(())
    }

    /// True iff the pixel's alpha is zero. Off-grid samples are never transparent.
    pub fn is_transparent(&self, x: i32, y: i32) -> bool {
        self.get(x, y).map(Color::is_transparent).unwrap_or(false)
    }

    /// Freezes a copy of the current contents
    pub fn snapshot(&self) -> Snapshot {
        Arc::new(self.clone())
    }
}

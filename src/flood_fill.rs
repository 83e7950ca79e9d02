use std::collections::VecDeque;

use crate::color::{Color, PaintColor};
use crate::pixel_buffer::PixelBuffer;

/// Fills the 4-connected region of the start pixel's color with `fill`.
///
/// Returns `false` without touching the buffer when the start is off-grid or the
/// region already has the fill color. Uses an explicit queue so the fill depth
/// is bounded by the grid size, not the call stack.
pub fn flood_fill(buffer: &mut PixelBuffer, start_x: i32, start_y: i32, fill: PaintColor) -> bool {
    fill_region(buffer, start_x, start_y, fill.to_pixel())
}

/// Same as [`flood_fill`] with an already-resolved pixel value
pub fn fill_region(buffer: &mut PixelBuffer, start_x: i32, start_y: i32, fill: Color) -> bool {
    let Ok(target) = buffer.get(start_x, start_y) else {
        log::trace!("Fill start ({}, {}) is off-grid", start_x, start_y);
        return false;
    };
    if target == fill {
        return false;
    }

    let width = buffer.width();
    let mut visited = vec![false; width * buffer.height()];
    let mut queue = VecDeque::new();
    let mut changed = false;

    queue.push_back((start_x, start_y));
    visited[start_y as usize * width + start_x as usize] = true;

    while let Some((x, y)) = queue.pop_front() {
        if buffer.get(x, y).ok() != Some(target) {
            continue;
        }
        if buffer.set(x, y, fill).is_ok() {
            changed = true;
        }

        for (nx, ny) in [(x, y - 1), (x + 1, y), (x, y + 1), (x - 1, y)] {
            if !buffer.contains(nx, ny) {
                continue;
            }
            let vi = ny as usize * width + nx as usize;
            if visited[vi] {
                continue;
            }
            visited[vi] = true;
            queue.push_back((nx, ny));
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pixel_grid() {
        let mut buffer = PixelBuffer::blank(1, 1).unwrap();
        assert!(flood_fill(&mut buffer, 0, 0, PaintColor::opaque(1, 2, 3)));
        assert_eq!(buffer.get(0, 0).unwrap(), Color::rgb(1, 2, 3));
    }

    #[test]
    fn test_off_grid_start_is_ignored() {
        let mut buffer = PixelBuffer::blank(3, 3).unwrap();
        assert!(!flood_fill(&mut buffer, 3, 0, PaintColor::opaque(1, 2, 3)));
        assert!(!flood_fill(&mut buffer, 0, -1, PaintColor::opaque(1, 2, 3)));
    }
}

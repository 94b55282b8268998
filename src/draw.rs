//! Drawing primitives for synthesizing canvases.
//!
//! All primitives clip to the canvas; nothing here can fail.

use crate::canvas::{Canvas, Rect};
use crate::color::{Rgba, BYTES_PER_PIXEL};

/// Fill `rect` with a solid color.
pub fn fill_rect(canvas: &mut Canvas, rect: Rect, color: Rgba) {
    let rect = rect.clip(canvas.width(), canvas.height());
    if rect.is_empty() {
        return;
    }
    let stride = canvas.stride();
    let bytes = color.to_bytes();
    let pixels = canvas.pixels_mut();
    for y in rect.top()..rect.bottom() {
        let start = y as usize * stride + rect.left() as usize * BYTES_PER_PIXEL;
        let end = start + rect.width as usize * BYTES_PER_PIXEL;
        for px in pixels[start..end].chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&bytes);
        }
    }
}

/// Draw the outline of `rect`, `thickness` pixels wide, inside its bounds.
pub fn draw_border(canvas: &mut Canvas, rect: Rect, color: Rgba, thickness: u32) {
    if rect.is_empty() || thickness == 0 {
        return;
    }
    let t_w = thickness.min(rect.width);
    let t_h = thickness.min(rect.height);
    let bands = [
        Rect::new(rect.x, rect.y, rect.width, t_h),
        Rect::new(rect.x, rect.bottom() - t_h, rect.width, t_h),
        Rect::new(rect.x, rect.y, t_w, rect.height),
        Rect::new(rect.right() - t_w, rect.y, t_w, rect.height),
    ];
    for band in bands {
        fill_rect(canvas, band, color);
    }
}

/// Draw a one-pixel line from `from` to `to` (both inclusive).
///
/// Uses integer Bresenham stepping; points outside the canvas are skipped
/// so the endpoints may lie off-canvas.
pub fn draw_line(canvas: &mut Canvas, from: (i64, i64), to: (i64, i64), color: Rgba) {
    let (mut x0, mut y0) = from;
    let (x1, y1) = to;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);

    loop {
        if (0..width).contains(&x0) && (0..height).contains(&y0) {
            canvas.set_pixel(x0 as u32, y0 as u32, color);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

//! Synthetic test canvases.
//!
//! Deterministic patterns for codec and layout tests. Random content is
//! seeded so failures reproduce.

#![allow(dead_code)]

use hudpng::{Canvas, Rect, Rgba};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// HUD background, `#14181F`.
pub const HUD_BG: Rgba = Rgba::opaque(0x14, 0x18, 0x1F);

/// A solid canvas.
pub fn solid(width: u32, height: u32, color: Rgba) -> Canvas {
    Canvas::new(width, height, color).unwrap()
}

/// Horizontal gradient in every channel, alpha descending.
pub fn gradient(width: u32, height: u32) -> Canvas {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = ((x * 255) / width.max(1)) as u8;
            let w = ((y * 255) / height.max(1)) as u8;
            pixels.extend_from_slice(&[v, w, v ^ w, 255 - v]);
        }
    }
    Canvas::from_pixels(width, height, pixels).unwrap()
}

/// Eight-pixel checkerboard of two colors.
pub fn checkerboard(width: u32, height: u32, a: Rgba, b: Rgba) -> Canvas {
    let mut canvas = solid(width, height, a);
    for y in 0..height {
        for x in 0..width {
            if ((x / 8) + (y / 8)) % 2 == 1 {
                canvas.set_pixel(x, y, b);
            }
        }
    }
    canvas
}

/// Seeded random noise.
pub fn noise(width: u32, height: u32, seed: u64) -> Canvas {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pixels = vec![0u8; (width * height * 4) as usize];
    rng.fill(&mut pixels[..]);
    Canvas::from_pixels(width, height, pixels).unwrap()
}

/// An empty 1280x720 HUD frame with a block of content at `rect`.
pub fn hud_with_block(rect: Rect, color: Rgba) -> Canvas {
    let mut canvas = solid(1280, 720, HUD_BG);
    hudpng::draw::fill_rect(&mut canvas, rect, color);
    canvas
}

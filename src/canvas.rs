//! RGBA pixel buffers and rectangles.

use std::fmt;

use crate::color::{Rgba, BYTES_PER_PIXEL};
use crate::error::{Error, Result};

/// An axis-aligned rectangle in pixel coordinates.
///
/// `right()` and `bottom()` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a rectangle from origin and size.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from its edges (`right`/`bottom` exclusive).
    ///
    /// Inverted edges produce an empty rectangle.
    #[inline]
    pub const fn from_edges(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self::new(
            left,
            top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )
    }

    /// Left edge (inclusive).
    #[inline]
    pub const fn left(&self) -> u32 {
        self.x
    }

    /// Top edge (inclusive).
    #[inline]
    pub const fn top(&self) -> u32 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// True when the rectangle covers no pixels.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when `(x, y)` lies inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Intersection with a `width` x `height` area anchored at the origin.
    pub fn clip(&self, width: u32, height: u32) -> Rect {
        let left = self.x.min(width);
        let top = self.y.min(height);
        Rect::from_edges(left, top, self.right().min(width), self.bottom().min(height))
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.left(),
            self.top(),
            self.right(),
            self.bottom()
        )
    }
}

/// An RGBA8 image held in memory, row-major with the top row first.
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// Create a canvas filled with a single color.
    pub fn new(width: u32, height: u32, fill: Rgba) -> Result<Self> {
        let len = buffer_len(width, height)?;
        let mut pixels = Vec::with_capacity(len);
        for _ in 0..len / BYTES_PER_PIXEL {
            pixels.extend_from_slice(&fill.to_bytes());
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap an existing RGBA buffer.
    ///
    /// The buffer must hold exactly `width * height * 4` bytes.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height)?;
        if pixels.len() != expected {
            return Err(Error::InvalidDataLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Bounds as a rectangle at the origin.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable raw RGBA bytes.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Consume the canvas, returning its buffer.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// One row of RGBA bytes.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.pixels[start..start + stride]
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.pixels.chunks_exact(self.stride())
    }

    /// Read the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the canvas.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        Rgba::from_slice(&self.pixels[self.offset(x, y)..])
    }

    /// Overwrite the pixel at `(x, y)`.
    ///
    /// # Panics
    /// Panics if the coordinate is outside the canvas.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let idx = self.offset(x, y);
        self.pixels[idx..idx + BYTES_PER_PIXEL].copy_from_slice(&color.to_bytes());
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

fn buffer_len(width: u32, height: u32) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or(Error::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_every_pixel() {
        let c = Canvas::new(3, 2, Rgba::new(1, 2, 3, 4)).unwrap();
        assert_eq!(c.pixels().len(), 3 * 2 * 4);
        assert!(c.pixels().chunks_exact(4).all(|p| p == [1, 2, 3, 4]));
    }

    #[test]
    fn test_from_pixels_length_mismatch() {
        let err = Canvas::from_pixels(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidDataLength {
                expected: 16,
                actual: 15
            }
        ));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            Canvas::new(0, 5, Rgba::WHITE),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Canvas::from_pixels(5, 0, Vec::new()),
            Err(Error::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_pixel_addressing_is_row_major() {
        let pixels: Vec<u8> = (1..=16).collect();
        let c = Canvas::from_pixels(2, 2, pixels).unwrap();
        assert_eq!(c.pixel(0, 0), Rgba::new(1, 2, 3, 4));
        assert_eq!(c.pixel(1, 0), Rgba::new(5, 6, 7, 8));
        assert_eq!(c.pixel(0, 1), Rgba::new(9, 10, 11, 12));
        assert_eq!(c.row(1), &[9, 10, 11, 12, 13, 14, 15, 16]);
    }

    #[test]
    #[should_panic]
    fn test_pixel_out_of_bounds_panics() {
        let c = Canvas::new(2, 2, Rgba::WHITE).unwrap();
        let _ = c.pixel(2, 0);
    }

    #[test]
    fn test_rect_edges_and_clip() {
        let r = Rect::from_edges(32, 24, 1248, 696);
        assert_eq!(r, Rect::new(32, 24, 1216, 672));
        assert_eq!((r.right(), r.bottom()), (1248, 696));
        assert!(r.contains(1247, 695));
        assert!(!r.contains(1248, 695));

        let clipped = Rect::new(8, 8, 10, 10).clip(12, 20);
        assert_eq!(clipped, Rect::new(8, 8, 4, 10));
        assert!(Rect::new(30, 30, 5, 5).clip(12, 12).is_empty());
    }
}

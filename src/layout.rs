//! HUD layout contract checks over decoded canvases.
//!
//! Two invariants are checked against a background color:
//!
//! 1. the toast region contains only background pixels, and
//! 2. every non-background pixel lies inside the safe area.
//!
//! The background is an explicit argument. [`background_at_origin`] gives
//! the conventional choice, the pixel at `(0, 0)`.

use std::fmt;

use crate::canvas::{Canvas, Rect};
use crate::color::{Rgba, BYTES_PER_PIXEL};

/// Fixed layout expectations for a baseline image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutContract {
    /// Required `(width, height)`.
    pub expected_size: (u32, u32),
    /// Region that must stay empty.
    pub toast_rect: Rect,
    /// Region that must contain all content.
    pub safe_area: Rect,
}

impl LayoutContract {
    /// The 1280x720 HUD contract.
    pub const HUD: LayoutContract = LayoutContract {
        expected_size: (1280, 720),
        toast_rect: Rect::new(340, 624, 600, 72),
        safe_area: Rect::from_edges(32, 24, 1248, 696),
    };
}

impl Default for LayoutContract {
    fn default() -> Self {
        Self::HUD
    }
}

/// Inclusive bounding box of non-background content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Smallest x holding content.
    pub min_x: u32,
    /// Smallest y holding content.
    pub min_y: u32,
    /// Largest x holding content.
    pub max_x: u32,
    /// Largest y holding content.
    pub max_y: u32,
}

impl Bounds {
    /// True when the whole box fits in `area` (exclusive right/bottom).
    pub fn within(&self, area: &Rect) -> bool {
        area.left() <= self.min_x
            && area.top() <= self.min_y
            && self.max_x < area.right()
            && self.max_y < area.bottom()
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({},{})-({},{})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

/// One broken layout invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Canvas dimensions differ from the contract.
    SizeMismatch {
        /// Size the contract requires.
        expected: (u32, u32),
        /// Size of the canvas.
        actual: (u32, u32),
    },
    /// A pixel inside a must-be-empty region differs from the background.
    RegionNotEmpty {
        /// The region checked.
        region: Rect,
        /// Column of the first offending pixel.
        x: u32,
        /// Row of the first offending pixel.
        y: u32,
        /// Background color.
        expected: Rgba,
        /// Offending pixel color.
        found: Rgba,
    },
    /// Content extends outside the safe area.
    OutOfSafeArea {
        /// Bounding box of all non-background pixels.
        bounds: Bounds,
        /// The safe area.
        safe_area: Rect,
    },
    /// The canvas holds nothing but background.
    NoContentDetected,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::SizeMismatch { expected, actual } => write!(
                f,
                "Expected {}x{} image, found {}x{}.",
                expected.0, expected.1, actual.0, actual.1
            ),
            Violation::RegionNotEmpty { region, x, y, .. } => {
                write!(f, "Region {region} not empty at ({x}, {y}).")
            }
            Violation::OutOfSafeArea { bounds, safe_area } => write!(
                f,
                "HUD dock exceeds safe area: bounds={bounds}, expected within ({},{})-({},{}).",
                safe_area.left(),
                safe_area.top(),
                safe_area.right().saturating_sub(1),
                safe_area.bottom().saturating_sub(1)
            ),
            Violation::NoContentDetected => write!(f, "No HUD pixels detected."),
        }
    }
}

/// Result of validating one canvas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    violations: Vec<Violation>,
}

impl Verdict {
    /// A verdict with no violations.
    pub fn pass() -> Self {
        Self::default()
    }

    /// True when no invariant was broken.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations in the order they were found.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Record a violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            return write!(f, "OK");
        }
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// The conventional background color: the pixel at `(0, 0)`.
pub fn background_at_origin(canvas: &Canvas) -> Rgba {
    canvas.pixel(0, 0)
}

/// Check `canvas` against `contract`.
///
/// A size mismatch is reported alone; otherwise the toast check runs first
/// and the safe-area check second.
pub fn validate(canvas: &Canvas, contract: &LayoutContract, background: Rgba) -> Verdict {
    let mut verdict = Verdict::pass();
    if canvas.size() != contract.expected_size {
        verdict.push(Violation::SizeMismatch {
            expected: contract.expected_size,
            actual: canvas.size(),
        });
        return verdict;
    }
    if let Err(v) = assert_region_empty(canvas, contract.toast_rect, background) {
        verdict.push(v);
    }
    if let Err(v) = assert_within_safe_area(canvas, contract.safe_area, background) {
        verdict.push(v);
    }
    verdict
}

/// Require every pixel of `region` to equal `background`.
///
/// Scans row-major and reports the first differing pixel. The region is
/// clipped to the canvas.
pub fn assert_region_empty(
    canvas: &Canvas,
    region: Rect,
    background: Rgba,
) -> Result<(), Violation> {
    let clipped = region.clip(canvas.width(), canvas.height());
    if clipped.is_empty() {
        return Ok(());
    }
    let bg = background.to_bytes();
    let x0 = clipped.left() as usize * BYTES_PER_PIXEL;
    let x1 = clipped.right() as usize * BYTES_PER_PIXEL;
    for y in clipped.top()..clipped.bottom() {
        let row = &canvas.row(y)[x0..x1];
        if let Some(i) = row.chunks_exact(BYTES_PER_PIXEL).position(|px| px != bg) {
            let x = clipped.left() + i as u32;
            return Err(Violation::RegionNotEmpty {
                region,
                x,
                y,
                expected: background,
                found: canvas.pixel(x, y),
            });
        }
    }
    Ok(())
}

/// Bounding box of all pixels differing from `background`, if any.
pub fn content_bounds(canvas: &Canvas, background: Rgba) -> Option<Bounds> {
    let bg = background.to_bytes();
    let mut bounds: Option<Bounds> = None;
    for (y, row) in canvas.rows().enumerate() {
        let y = y as u32;
        let mut pixels = row.chunks_exact(BYTES_PER_PIXEL);
        let Some(first) = pixels.position(|px| px != bg) else {
            continue;
        };
        let last = row
            .chunks_exact(BYTES_PER_PIXEL)
            .rposition(|px| px != bg)
            .unwrap_or(first);
        let (first, last) = (first as u32, last as u32);
        bounds = Some(match bounds {
            None => Bounds {
                min_x: first,
                min_y: y,
                max_x: last,
                max_y: y,
            },
            Some(b) => Bounds {
                min_x: b.min_x.min(first),
                min_y: b.min_y,
                max_x: b.max_x.max(last),
                max_y: y,
            },
        });
    }
    bounds
}

/// Require all non-background pixels to lie inside `safe_area`.
pub fn assert_within_safe_area(
    canvas: &Canvas,
    safe_area: Rect,
    background: Rgba,
) -> Result<Bounds, Violation> {
    let bounds = content_bounds(canvas, background).ok_or(Violation::NoContentDetected)?;
    if bounds.within(&safe_area) {
        Ok(bounds)
    } else {
        Err(Violation::OutOfSafeArea { bounds, safe_area })
    }
}

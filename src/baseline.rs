//! HUD baseline scenes and the batch generate/check drivers.
//!
//! [`generate`] writes four deterministic 1280x720 scenes. [`check_dir`]
//! decodes every `*.png` in a directory and validates it against a
//! [`LayoutContract`]. A failing file never aborts its siblings.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::canvas::{Canvas, Rect};
use crate::color::Rgba;
use crate::draw::{draw_border, fill_rect};
use crate::error::{Error, Result};
use crate::layout::{self, LayoutContract, Verdict};
use crate::png::{self, DecodeOptions, EncodeOptions};

/// Baseline canvas width.
pub const WIDTH: u32 = 1280;
/// Baseline canvas height.
pub const HEIGHT: u32 = 720;

/// Scene background, `#14181F`.
pub const BACKGROUND: Rgba = Rgba::opaque(0x14, 0x18, 0x1F);

const DOCK_RECT: Rect = Rect::new(928, 24, 288, 128);
const DOCK_BORDER: Rgba = Rgba::new(0x2A, 0x30, 0x38, 0xFF);
const SLOT_OUTLINE: Rgba = Rgba::new(0x2F, 0x36, 0x3F, 0xFF);
const SLOT_FILL: Rgba = Rgba::new(0x1D, 0x22, 0x2A, 0xFF);
const SLOT_SHADE: Rgba = Rgba::new(0x0F, 0x13, 0x18, 0xFF);
const TEXT_TINT: Rgba = Rgba::new(0xFF, 0xFF, 0xFF, 0x80);

/// Slot rectangles: power, economy, population.
pub const SLOT_RECTS: [Rect; 3] = [
    Rect::new(992, 24, 224, 32),
    Rect::new(992, 64, 224, 32),
    Rect::new(992, 104, 224, 32),
];

/// A named baseline image.
#[derive(Debug, Clone)]
pub struct Scene {
    /// File name, including the `.png` extension.
    pub name: &'static str,
    /// Rendered pixels.
    pub canvas: Canvas,
}

fn base_canvas() -> Result<Canvas> {
    let mut canvas = Canvas::new(WIDTH, HEIGHT, BACKGROUND)?;
    draw_border(&mut canvas, DOCK_RECT, DOCK_BORDER, 1);
    Ok(canvas)
}

fn draw_slot_block(canvas: &mut Canvas, rect: Rect, accent: Rgba, active: bool) {
    let fill = SLOT_FILL.blend(accent, if active { 0.08 } else { 0.0 });
    let border = accent.blend(SLOT_SHADE, 0.6);
    fill_rect(canvas, rect, fill);
    draw_border(canvas, rect, border, 1);

    let icon = rect.height.saturating_sub(12);
    fill_rect(
        canvas,
        Rect::new(rect.x + 10, rect.y + 6, icon, icon),
        accent.blend(SLOT_SHADE, 0.3),
    );

    let text_bar = Rect::new(
        rect.x + icon + 16,
        rect.bottom().saturating_sub(6),
        rect.width.saturating_sub(icon + 24),
        4,
    );
    fill_rect(canvas, text_bar, accent.blend(TEXT_TINT, 0.5));
}

fn blank_reference() -> Result<Canvas> {
    let mut canvas = base_canvas()?;
    for rect in SLOT_RECTS {
        draw_border(&mut canvas, rect, SLOT_OUTLINE, 1);
    }
    Ok(canvas)
}

fn power_variant(accent: Rgba) -> Result<Canvas> {
    let mut canvas = base_canvas()?;
    for rect in &SLOT_RECTS[1..] {
        draw_slot_block(&mut canvas, *rect, Rgba::WHITE, true);
    }
    draw_slot_block(&mut canvas, SLOT_RECTS[0], accent, true);
    Ok(canvas)
}

/// Render the four baseline scenes.
pub fn scenes() -> Result<Vec<Scene>> {
    Ok(vec![
        Scene {
            name: "hud_blank_reference.png",
            canvas: blank_reference()?,
        },
        Scene {
            name: "hud_power_normal.png",
            canvas: power_variant(Rgba::WHITE)?,
        },
        Scene {
            name: "hud_power_warning.png",
            canvas: power_variant(Rgba::new(0xFF, 0xB3, 0x00, 0xFF))?,
        },
        Scene {
            name: "hud_power_critical.png",
            canvas: power_variant(Rgba::new(0xFF, 0x17, 0x44, 0xFF))?,
        },
    ])
}

/// Sorted list of `*.png` files directly inside `dir`.
pub fn list_pngs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "png") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Write every scene into `dir`, replacing any existing `*.png` files.
///
/// Returns the written paths in scene order.
pub fn generate(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    for stale in list_pngs(dir)? {
        debug!(path = %stale.display(), "removing stale baseline");
        fs::remove_file(&stale)?;
    }

    let options = EncodeOptions::max_compression();
    let mut written = Vec::with_capacity(4);
    let mut buf = Vec::new();
    for scene in scenes()? {
        png::encode_into(&mut buf, &scene.canvas, &options)?;
        let path = dir.join(scene.name);
        fs::write(&path, &buf)?;
        debug!(path = %path.display(), bytes = buf.len(), "wrote baseline");
        written.push(path);
    }
    info!(dir = %dir.display(), count = written.len(), "generated baselines");
    Ok(written)
}

/// Settings for [`check_dir`].
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Layout expectations.
    pub contract: LayoutContract,
    /// Background color; `None` uses each image's pixel at `(0, 0)`.
    pub background: Option<Rgba>,
    /// Decoder settings.
    pub decode: DecodeOptions,
}

/// Check a single decoded canvas with these options.
pub fn check_canvas(canvas: &Canvas, options: &CheckOptions) -> Verdict {
    let background = options
        .background
        .unwrap_or_else(|| layout::background_at_origin(canvas));
    layout::validate(canvas, &options.contract, background)
}

/// Read, decode and validate one file.
pub fn check_file(path: &Path, options: &CheckOptions) -> Result<Verdict> {
    let bytes = fs::read(path)?;
    let canvas = png::decode_with_options(&bytes, &options.decode)?;
    Ok(check_canvas(&canvas, options))
}

/// Outcome for one file in a batch.
#[derive(Debug)]
pub struct FileOutcome {
    /// Path that was checked.
    pub path: PathBuf,
    /// Decode error, or the layout verdict.
    pub result: Result<Verdict>,
}

impl FileOutcome {
    /// File name for display.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// True when the file decoded and every invariant held.
    pub fn passed(&self) -> bool {
        matches!(&self.result, Ok(v) if v.passed())
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(v) if v.passed() => write!(f, "OK {}", self.name()),
            Ok(v) => write!(f, "{}: {v}", self.name()),
            Err(e) => write!(f, "{}: {e}", self.name()),
        }
    }
}

/// Per-file outcomes of [`check_dir`], in sorted path order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per file.
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    /// Number of passing files.
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    /// Number of failing files.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// True when every file passed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

fn check_one(path: PathBuf, options: &CheckOptions) -> FileOutcome {
    let result = check_file(&path, options);
    match &result {
        Ok(v) if v.passed() => debug!(path = %path.display(), "baseline ok"),
        Ok(v) => warn!(path = %path.display(), verdict = %v, "layout violation"),
        Err(e) => warn!(path = %path.display(), error = %e, "failed to read baseline"),
    }
    FileOutcome { path, result }
}

/// Check every `*.png` in `dir`.
///
/// A missing directory or one with no PNG files is an
/// [`Error::NoBaselines`]. Per-file failures are reported in the
/// returned [`BatchReport`].
pub fn check_dir(dir: &Path, options: &CheckOptions) -> Result<BatchReport> {
    if !dir.is_dir() {
        return Err(Error::NoBaselines(dir.to_path_buf()));
    }
    let paths = list_pngs(dir)?;
    if paths.is_empty() {
        return Err(Error::NoBaselines(dir.to_path_buf()));
    }

    #[cfg(feature = "parallel")]
    let outcomes: Vec<FileOutcome> = {
        use rayon::prelude::*;
        paths
            .into_par_iter()
            .map(|p| check_one(p, options))
            .collect()
    };
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<FileOutcome> = paths.into_iter().map(|p| check_one(p, options)).collect();

    let report = BatchReport { outcomes };
    info!(
        dir = %dir.display(),
        passed = report.passed(),
        failed = report.failed(),
        "checked baselines"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenes_pass_default_contract() {
        let contract = LayoutContract::default();
        for scene in scenes().unwrap() {
            let verdict = layout::validate(&scene.canvas, &contract, BACKGROUND);
            assert!(verdict.passed(), "{}: {verdict}", scene.name);
        }
    }

    #[test]
    fn test_scene_names_and_size() {
        let scenes = scenes().unwrap();
        let names: Vec<_> = scenes.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            [
                "hud_blank_reference.png",
                "hud_power_normal.png",
                "hud_power_warning.png",
                "hud_power_critical.png"
            ]
        );
        assert!(scenes.iter().all(|s| s.canvas.size() == (WIDTH, HEIGHT)));
    }

    #[test]
    fn test_blank_reference_pixels() {
        let c = blank_reference().unwrap();
        assert_eq!(c.pixel(0, 0), BACKGROUND);
        assert_eq!(c.pixel(928, 24), DOCK_BORDER);
        assert_eq!(c.pixel(992, 64), SLOT_OUTLINE);
        assert_eq!(c.pixel(1000, 40), BACKGROUND);
    }

    #[test]
    fn test_power_slot_colors() {
        let accent = Rgba::new(0xFF, 0x17, 0x44, 0xFF);
        let c = power_variant(accent).unwrap();
        // Border is accent blended 60% toward the shade.
        assert_eq!(c.pixel(992, 24), accent.blend(SLOT_SHADE, 0.6));
        // Icon spans x 1002..1022, y 30..50.
        assert_eq!(c.pixel(1002, 30), accent.blend(SLOT_SHADE, 0.3));
        // Text bar starts at x 1028, y 50.
        assert_eq!(c.pixel(1028, 50), accent.blend(TEXT_TINT, 0.5));
        assert_eq!(c.pixel(1028, 50).a, 191);
        // Interior fill.
        assert_eq!(c.pixel(1100, 30), SLOT_FILL.blend(accent, 0.08));
    }

    #[test]
    fn test_warning_and_critical_differ_only_in_first_slot() {
        let warn = power_variant(Rgba::new(0xFF, 0xB3, 0x00, 0xFF)).unwrap();
        let crit = power_variant(Rgba::new(0xFF, 0x17, 0x44, 0xFF)).unwrap();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if !SLOT_RECTS[0].contains(x, y) {
                    assert_eq!(warn.pixel(x, y), crit.pixel(x, y), "({x}, {y})");
                }
            }
        }
        assert_ne!(warn.pixel(992, 24), crit.pixel(992, 24));
    }
}

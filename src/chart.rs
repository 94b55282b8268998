//! Minimal line chart rendering for telemetry series.

use crate::canvas::{Canvas, Rect};
use crate::color::Rgba;
use crate::draw::{draw_line, fill_rect};

/// Chart width in pixels.
pub const CHART_WIDTH: u32 = 480;
/// Chart height in pixels.
pub const CHART_HEIGHT: u32 = 260;
/// Gap between the canvas edge and the plot area.
pub const MARGIN: u32 = 24;

const BACKGROUND: Rgba = Rgba::new(248, 249, 255, 255);
const AXIS: Rgba = Rgba::new(213, 219, 240, 255);
const SERIES: Rgba = Rgba::new(78, 119, 212, 255);

/// Render `values` as a polyline over a light background with two axes.
///
/// Returns `None` for fewer than two values. The series is scaled so its
/// minimum sits on the x axis and its maximum on the top of the plot area;
/// a flat series is drawn along the x axis.
pub fn render_line_chart(values: &[f64]) -> Option<Canvas> {
    if values.len() < 2 {
        return None;
    }
    let (w, h) = (CHART_WIDTH, CHART_HEIGHT);
    let mut canvas = Canvas::new(w, h, BACKGROUND).ok()?;

    // x axis stops one short of the right margin; y axis includes its foot.
    fill_rect(&mut canvas, Rect::new(MARGIN, h - MARGIN, w - 2 * MARGIN, 1), AXIS);
    fill_rect(&mut canvas, Rect::new(MARGIN, MARGIN, 1, h - 2 * MARGIN + 1), AXIS);

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scale = (max - min).max(1e-6);
    let usable_w = f64::from(w - 2 * MARGIN);
    let usable_h = f64::from(h - 2 * MARGIN);
    let last = (values.len() - 1) as f64;

    let to_screen = |idx: usize, value: f64| -> (i64, i64) {
        let x = (idx as f64 / last * usable_w).round_ties_even() as i64;
        let norm = (value - min) / scale;
        let y = (norm * usable_h).round_ties_even() as i64;
        (i64::from(MARGIN) + x, i64::from(h - MARGIN) - y)
    };

    let mut prev = to_screen(0, values[0]);
    for (idx, &value) in values.iter().enumerate().skip(1) {
        let next = to_screen(idx, value);
        draw_line(&mut canvas, prev, next, SERIES);
        prev = next;
    }
    Some(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_values() {
        assert!(render_line_chart(&[]).is_none());
        assert!(render_line_chart(&[1.0]).is_none());
    }

    #[test]
    fn test_axes() {
        let c = render_line_chart(&[0.0, 0.0]).unwrap();
        assert_eq!(c.size(), (480, 260));
        assert_eq!(c.pixel(0, 0), BACKGROUND);
        assert_eq!(c.pixel(24, 24), AXIS);
        assert_eq!(c.pixel(455, 236), AXIS);
        assert_eq!(c.pixel(456, 236), BACKGROUND);
        assert_eq!(c.pixel(24, 237), BACKGROUND);
    }

    #[test]
    fn test_series_endpoints() {
        let c = render_line_chart(&[0.0, 10.0]).unwrap();
        // Minimum lands on the x axis, maximum on the top of the plot area.
        assert_eq!(c.pixel(24, 236), SERIES);
        assert_eq!(c.pixel(456, 24), SERIES);
    }

    #[test]
    fn test_flat_series_on_axis() {
        let c = render_line_chart(&[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(c.pixel(240, 236), SERIES);
        assert_eq!(c.pixel(240, 235), BACKGROUND);
    }
}

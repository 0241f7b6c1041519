// Heatmap rendering of escape counts, with axis ticks mapped back to
// complex-plane coordinates.

use std::path::Path;

use clap::ValueEnum;
use image::{Rgb, RgbImage};

use crate::config::Region;
use crate::error::Result;
use crate::grid::ResultGrid;

pub const LEFT_MARGIN: u32 = 28;
pub const BOTTOM_MARGIN: u32 = 12;
const MARGIN_COLOR: Rgb<u8> = Rgb([24, 24, 24]);
const TICK_COLOR: Rgb<u8> = Rgb([220, 220, 220]);

/// Colour gradient for normalised counts in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorMap {
    /// black -> red -> yellow -> white
    Hot,

    /// black -> purple -> orange -> yellow
    Gnuplot,
}

impl ColorMap {
    pub fn color(&self, t: f64) -> Rgb<u8> {
        let t = t.clamp(0.0, 1.0);
        let (r, g, b) = match self {
            ColorMap::Hot => (
                (t / 0.365).min(1.0),
                ((t - 0.365) / 0.381).clamp(0.0, 1.0),
                ((t - 0.746) / 0.254).clamp(0.0, 1.0),
            ),
            ColorMap::Gnuplot => (
                t.sqrt(),
                t * t * t,
                (2.0 * std::f64::consts::PI * t).sin().max(0.0),
            ),
        };
        Rgb([(r * 255.0).round() as u8, (g * 255.0).round() as u8, (b * 255.0).round() as u8])
    }
}

#[derive(Clone, Copy, Debug)]
pub struct HeatmapOptions {
    pub colormap: ColorMap,
    /// Exponent of the power-law normalisation; below 1 brightens low counts
    pub gamma: f64,
    /// Colour for points that never escaped. `None` runs them through the colour map.
    pub interior: Option<Rgb<u8>>,
    /// Pixel distance between axis ticks. `None` draws no axes or margins.
    pub tick_spacing: Option<usize>,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        HeatmapOptions {
            colormap: ColorMap::Hot,
            gamma: 0.4,
            interior: Some(Rgb([0, 0, 0])),
            tick_spacing: Some(3 * 72),
        }
    }
}

/// `((value - min) / (max - min))^gamma`, or 0 for a flat range
pub fn power_norm(value: u32, min: u32, max: u32, gamma: f64) -> f64 {
    if max <= min {
        return 0.0;
    }
    let t = (value.saturating_sub(min)) as f64 / (max - min) as f64;
    t.clamp(0.0, 1.0).powf(gamma)
}

/// Tick pixel positions every `spacing` pixels, paired with the coordinate each maps to.
pub fn axis_ticks(min: f64, max: f64, pixels: usize, spacing: usize) -> Vec<(usize, f64)> {
    if spacing == 0 || pixels == 0 {
        return Vec::new();
    }
    (0..pixels)
        .step_by(spacing)
        .map(|tick| (tick, min + (max - min) * tick as f64 / pixels as f64))
        .collect()
}

/// Renders `grid` with real index along x and imaginary index up the y axis.
pub fn render_heatmap(grid: &ResultGrid, region: &Region, options: &HeatmapOptions) -> RgbImage {
    let width = grid.width() as u32;
    let height = grid.height() as u32;
    let max_iterations = grid.max_iterations();

    // Normalise over the values actually drawn by the colour map
    let visible = grid.counts().iter().copied()
        .filter(|&n| options.interior.is_none() || n < max_iterations);
    let (lo, hi) = visible.fold((u32::MAX, 0), |(lo, hi), n| (lo.min(n), hi.max(n)));

    let (off_x, canvas_w, canvas_h) = match options.tick_spacing {
        Some(_) => (LEFT_MARGIN, width + LEFT_MARGIN, height + BOTTOM_MARGIN),
        None => (0, width, height),
    };
    let mut canvas = RgbImage::from_pixel(canvas_w, canvas_h, MARGIN_COLOR);

    for i in 0..grid.width() {
        for j in 0..grid.height() {
            let n = grid.get(i, j);
            let color = match options.interior {
                Some(interior) if n >= max_iterations => interior,
                _ => options.colormap.color(power_norm(n, lo, hi, options.gamma)),
            };
            // Origin at the bottom left
            let y = height - 1 - j as u32;
            canvas.put_pixel(off_x + i as u32, y, color);
        }
    }

    if let Some(spacing) = options.tick_spacing {
        draw_axes(&mut canvas, region, grid.width(), grid.height(), spacing);
    }
    canvas
}

fn draw_axes(canvas: &mut RgbImage, region: &Region, width: usize, height: usize, spacing: usize) {
    for (tick, value) in axis_ticks(region.x_min, region.x_max, width, spacing) {
        let x = LEFT_MARGIN + tick as u32;
        for dy in 0..3 {
            put(canvas, x as i64, (height as u32 + dy) as i64, TICK_COLOR);
        }
        let label = format!("{:.2}", value);
        let half = (label.len() * 4 / 2) as i64;
        draw_text(canvas, x as i64 - half, height as i64 + 5, &label, TICK_COLOR);
    }

    for (tick, value) in axis_ticks(region.y_min, region.y_max, height, spacing) {
        let y = (height - 1 - tick) as i64;
        for dx in 1..4 {
            put(canvas, LEFT_MARGIN as i64 - dx, y, TICK_COLOR);
        }
        draw_text(canvas, 1, y - 2, &format!("{:.2}", value), TICK_COLOR);
    }
}

fn put(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < canvas.width() && (y as u32) < canvas.height() {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}

// 3x5 pixel font, only what tick labels need
fn draw_char(canvas: &mut RgbImage, x: i64, y: i64, ch: char, color: Rgb<u8>) {
    let pattern: &[u8] = match ch {
        '0' => &[0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => &[0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => &[0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => &[0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => &[0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => &[0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => &[0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => &[0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => &[0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => &[0b111, 0b101, 0b111, 0b001, 0b111],
        '.' => &[0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => &[0b000, 0b000, 0b111, 0b000, 0b000],
        _ => &[0b000, 0b000, 0b000, 0b000, 0b000],
    };

    for (dy, &row) in pattern.iter().enumerate() {
        for dx in 0..3 {
            if row & (1 << (2 - dx)) != 0 {
                put(canvas, x + dx, y + dy as i64, color);
            }
        }
    }
}

fn draw_text(canvas: &mut RgbImage, x: i64, y: i64, text: &str, color: Rgb<u8>) {
    for (k, ch) in text.chars().enumerate() {
        draw_char(canvas, x + 4 * k as i64, y, ch, color);
    }
}

pub fn save_png<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<()> {
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare() -> HeatmapOptions {
        HeatmapOptions { tick_spacing: None, ..HeatmapOptions::default() }
    }

    #[test]
    fn ticks_follow_the_pixel_to_coordinate_formula() {
        let ticks = axis_ticks(-2.0, 0.5, 720, 216);
        let pixels: Vec<usize> = ticks.iter().map(|t| t.0).collect();
        assert_eq!(pixels, vec![0, 216, 432, 648]);
        assert_eq!(ticks[0].1, -2.0);
        assert!((ticks[1].1 - (-2.0 + 2.5 * 216.0 / 720.0)).abs() < 1e-12);
        assert!(axis_ticks(0.0, 1.0, 10, 0).is_empty());
    }

    #[test]
    fn power_norm_brightens_low_values() {
        assert_eq!(power_norm(0, 0, 100, 0.4), 0.0);
        assert_eq!(power_norm(100, 0, 100, 0.4), 1.0);
        assert!(power_norm(10, 0, 100, 0.4) > 0.1);
        assert_eq!(power_norm(5, 5, 5, 0.4), 0.0);
    }

    #[test]
    fn hot_map_endpoints() {
        assert_eq!(ColorMap::Hot.color(0.0), Rgb([0, 0, 0]));
        assert_eq!(ColorMap::Hot.color(1.0), Rgb([255, 255, 255]));
    }

    #[test]
    fn gnuplot_map_endpoints() {
        assert_eq!(ColorMap::Gnuplot.color(0.0), Rgb([0, 0, 0]));
        let top = ColorMap::Gnuplot.color(1.0);
        assert_eq!((top[0], top[1]), (255, 255));
        assert_eq!(top[2], 0);
    }

    #[test]
    fn interior_keeps_its_own_colour() {
        // counts[i * height + j]; (0, 0) interior, (1, 0) escapes at step 0
        let grid = ResultGrid::from_counts(2, 2, 10, vec![10, 4, 0, 9]);
        let region = Region::default();
        let options = HeatmapOptions { interior: Some(Rgb([0, 0, 255])), ..bare() };
        let img = render_heatmap(&grid, &region, &options);
        assert_eq!(img.dimensions(), (2, 2));
        // (0, 0) lands bottom left
        assert_eq!(*img.get_pixel(0, 1), Rgb([0, 0, 255]));
        assert_eq!(*img.get_pixel(1, 1), Rgb([0, 0, 0]));
        assert_ne!(img.get_pixel(0, 1), img.get_pixel(1, 1));
    }

    #[test]
    fn axes_add_margins() {
        let grid = ResultGrid::from_counts(30, 30, 5, vec![1; 900]);
        let options = HeatmapOptions { tick_spacing: Some(10), ..HeatmapOptions::default() };
        let img = render_heatmap(&grid, &Region::default(), &options);
        assert_eq!(img.dimensions(), (30 + LEFT_MARGIN, 30 + BOTTOM_MARGIN));
        // first x tick mark sits just under the plot
        assert_eq!(*img.get_pixel(LEFT_MARGIN, 30), TICK_COLOR);
    }
}

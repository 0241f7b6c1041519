use std::path::Path;
use std::time::Instant;

use image::RgbImage;
use minifb::{Key, Window, WindowOptions};
use tracing::info;

use crate::config::MandelbrotConfig;
use crate::error::{MandelbrotError, Result};
use crate::image::{render_heatmap, save_png, HeatmapOptions};
use crate::strategy::Strategy;

/// Packs an RGB image into the 0RGB buffer layout minifb expects.
pub fn to_framebuffer(image: &RgbImage) -> Vec<u32> {
    image.pixels()
        .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
        .collect()
}

/// Opens a window with `image` and blocks until it is closed or Escape is pressed.
pub fn show_window(title: &str, image: &RgbImage) -> Result<()> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let buffer = to_framebuffer(image);

    let mut window = Window::new(title, width, height, WindowOptions::default())
        .map_err(|e| MandelbrotError::Display(e.to_string()))?;
    window.set_target_fps(30);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(&buffer, width, height)
            .map_err(|e| MandelbrotError::Display(e.to_string()))?;
    }
    Ok(())
}

/// Where a rendered heatmap goes
#[derive(Clone, Debug)]
pub enum Output<'a> {
    Window,
    Directory(&'a Path),
}

/// Computes `config` with `strategy`, renders it and sends it to `output`.
/// Returns the compute-and-render time, which is also printed next to the label.
pub fn visualize(
    strategy: Strategy,
    config: &MandelbrotConfig,
    options: &HeatmapOptions,
    output: &Output<'_>,
) -> Result<f64> {
    let start = Instant::now();
    let grid = strategy.compute(config)?;
    let image = render_heatmap(&grid, &config.region, options);
    let seconds = start.elapsed().as_secs_f64();
    println!("{}\t\t{}s", strategy.label(), seconds);

    match output {
        Output::Window => show_window(strategy.label(), &image)?,
        Output::Directory(dir) => {
            let path = dir.join(format!("{}.png", strategy.id()));
            save_png(&image, &path)?;
            info!(path = %path.display(), "saved heatmap");
        }
    }
    Ok(seconds)
}

/// Every strategy except the slow complex-type baseline, one after another.
pub fn visualize_all(config: &MandelbrotConfig, options: &HeatmapOptions, output: &Output<'_>) -> Result<()> {
    for strategy in Strategy::ALL.into_iter().filter(|s| *s != Strategy::Scalar) {
        visualize(strategy, config, options, output)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Region, Resolution};
    use image::Rgb;

    #[test]
    fn framebuffer_packs_rgb() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([0x12, 0x34, 0x56]));
        img.put_pixel(1, 0, Rgb([0xff, 0, 0]));
        assert_eq!(to_framebuffer(&img), vec![0x123456, 0xff0000]);
    }

    #[test]
    fn visualize_all_writes_one_png_per_strategy() {
        let dir = std::env::temp_dir().join(format!("mandelbrot-bench-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let config = MandelbrotConfig::new(Region::default(), Resolution::square(16).unwrap(), 20).unwrap();
        let options = HeatmapOptions { tick_spacing: Some(8), ..HeatmapOptions::default() };

        visualize_all(&config, &options, &Output::Directory(&dir)).unwrap();

        for strategy in Strategy::ALL {
            let path = dir.join(format!("{}.png", strategy.id()));
            assert_eq!(path.exists(), strategy != Strategy::Scalar, "{}", path.display());
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

pub mod math;
pub mod error;
pub mod config;
pub mod fractal;
pub mod grid;
pub mod strategy;
pub mod vectorized;
pub mod parallel;
pub mod bench;
pub mod image;
pub mod visualizer;

pub use math::C;
pub use error::{MandelbrotError, Result};
pub use config::{MandelbrotConfig, Region, Resolution};
pub use fractal::{mandelbrot_escapes, mandelbrot_escapes_complex, ESCAPE_RADIUS_SQ};
pub use grid::{linspace, ResultGrid, SampleGrid};
pub use strategy::Strategy;
pub use parallel::partition;
pub use bench::{Benchmark, BenchmarkRecord, LoadRound, Profile};
pub use crate::image::{render_heatmap, ColorMap, HeatmapOptions};
pub use visualizer::{visualize, visualize_all, Output};

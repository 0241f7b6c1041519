use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MandelbrotConfig;
use crate::error::Result;
use crate::fractal::{mandelbrot_escapes, mandelbrot_escapes_complex};
use crate::grid::{ResultGrid, SampleGrid};
use crate::math::C;
use crate::{parallel, vectorized};

/// Execution technique for computing a full result grid.
///
/// Every variant takes the same `MandelbrotConfig` and returns the same
/// `ResultGrid` for it; they differ only in how the work is carried out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Per-point loop over the complex type
    Scalar,

    /// Per-point loop with split real/imaginary parts
    ScalarSplit,

    /// Whole-grid masked iteration, one step at a time
    Vectorized,

    /// Flattened points partitioned across a worker pool
    Parallel,

    /// One task per real-axis column across a worker pool
    ParallelRows,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Scalar,
        Strategy::ScalarSplit,
        Strategy::Vectorized,
        Strategy::Parallel,
        Strategy::ParallelRows,
    ];

    pub fn fastest() -> Strategy {
        Strategy::ParallelRows
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Scalar => "Scalar:",
            Strategy::ScalarSplit => "Split scalar:",
            Strategy::Vectorized => "Vectorized:",
            Strategy::Parallel => "Parallel:",
            Strategy::ParallelRows => "Parallel rows:",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Strategy::Scalar => "scalar",
            Strategy::ScalarSplit => "scalar-split",
            Strategy::Vectorized => "vectorized",
            Strategy::Parallel => "parallel",
            Strategy::ParallelRows => "parallel-rows",
        }
    }

    /// Validates `config`, then computes the grid. Nothing is evaluated on invalid input.
    pub fn compute(&self, config: &MandelbrotConfig) -> Result<ResultGrid> {
        config.validate()?;
        let samples = SampleGrid::new(&config.region, &config.resolution);
        debug!(strategy = self.id(), points = samples.len(), max_iterations = config.max_iterations, "computing set");
        let grid = self.compute_samples(&samples, config.max_iterations)?;
        debug!(strategy = self.id(), "done");
        Ok(grid)
    }

    /// Computes over an already sampled grid. `max_iterations` must be at least 1.
    pub fn compute_samples(&self, samples: &SampleGrid, max_iterations: u32) -> Result<ResultGrid> {
        match self {
            Strategy::Scalar => Ok(scalar(samples, max_iterations, mandelbrot_escapes_complex)),
            Strategy::ScalarSplit => Ok(scalar(samples, max_iterations, mandelbrot_escapes)),
            Strategy::Vectorized => Ok(vectorized::compute(samples, max_iterations)),
            Strategy::Parallel => parallel::compute_points(samples, max_iterations),
            Strategy::ParallelRows => parallel::compute_rows(samples, max_iterations),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

fn scalar<F>(samples: &SampleGrid, max_iterations: u32, escapes: F) -> ResultGrid
where
    F: Fn(C, u32) -> u32,
{
    let mut counts = Vec::with_capacity(samples.len());
    for i in 0..samples.width() {
        for j in 0..samples.height() {
            counts.push(escapes(samples.point(i, j), max_iterations));
        }
    }
    ResultGrid::from_counts(samples.width(), samples.height(), max_iterations, counts)
}

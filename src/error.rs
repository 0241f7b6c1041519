use thiserror::Error;

/// Errors raised while validating inputs or computing a set
#[derive(Debug, Error)]
pub enum MandelbrotError {
    #[error("invalid region: {axis}_min ({min}) must be finite and less than {axis}_max ({max})")]
    InvalidRegion { axis: char, min: f64, max: f64 },

    #[error("invalid resolution {width}x{height}: {reason}")]
    InvalidResolution { width: usize, height: usize, reason: &'static str },

    #[error("invalid iteration bound {0}: max_iterations must be at least 1")]
    InvalidIterationBound(u32),

    #[error("invalid run count: at least one execution run is required")]
    InvalidRuns,

    #[error("worker {worker} failed: {message}")]
    WorkerFailure { worker: usize, message: String },

    #[error("failed to build worker pool: {0}")]
    WorkerPool(String),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("display error: {0}")]
    Display(String),
}

pub type Result<T> = std::result::Result<T, MandelbrotError>;

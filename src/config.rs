use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MandelbrotError, Result};

/// Rectangle of the complex plane to sample
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Region {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self> {
        let region = Region { x_min, x_max, y_min, y_max };
        region.validate()?;
        Ok(region)
    }

    pub fn validate(&self) -> Result<()> {
        // Written as !(min < max) so NaN bounds are rejected too
        if !(self.x_min < self.x_max) || !self.x_min.is_finite() || !self.x_max.is_finite() {
            return Err(MandelbrotError::InvalidRegion { axis: 'x', min: self.x_min, max: self.x_max });
        }
        if !(self.y_min < self.y_max) || !self.y_min.is_finite() || !self.y_max.is_finite() {
            return Err(MandelbrotError::InvalidRegion { axis: 'y', min: self.y_min, max: self.y_max });
        }
        Ok(())
    }
}

impl Default for Region {
    fn default() -> Self {
        Region { x_min: -2.0, x_max: 0.5, y_min: -1.2, y_max: 1.2 }
    }
}

/// Sample counts along the real (width) and imaginary (height) axes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
    #[serde(default = "square_by_default")]
    pub require_square: bool,
}

fn square_by_default() -> bool { true }

impl Resolution {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let resolution = Resolution { width, height, require_square: true };
        resolution.validate()?;
        Ok(resolution)
    }

    /// Opts out of the width == height convention.
    pub fn new_unchecked_aspect(width: usize, height: usize) -> Result<Self> {
        let resolution = Resolution { width, height, require_square: false };
        resolution.validate()?;
        Ok(resolution)
    }

    pub fn square(size: usize) -> Result<Self> {
        Self::new(size, size)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason| MandelbrotError::InvalidResolution {
            width: self.width,
            height: self.height,
            reason,
        };
        if self.width == 0 {
            return Err(invalid("width must be at least 1"));
        }
        if self.height == 0 {
            return Err(invalid("height must be at least 1"));
        }
        if self.require_square && self.width != self.height {
            return Err(invalid("width and height must be equal"));
        }
        Ok(())
    }

    pub fn points(&self) -> usize {
        self.width * self.height
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution { width: 1000, height: 1000, require_square: true }
    }
}

/// Immutable inputs for one computation. Load scaling builds new values, never mutates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MandelbrotConfig {
    #[serde(default)]
    pub region: Region,
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

fn default_max_iterations() -> u32 { 80 }

impl MandelbrotConfig {
    pub fn new(region: Region, resolution: Resolution, max_iterations: u32) -> Result<Self> {
        let config = MandelbrotConfig { region, resolution, max_iterations };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.region.validate()?;
        self.resolution.validate()?;
        if self.max_iterations == 0 {
            return Err(MandelbrotError::InvalidIterationBound(self.max_iterations));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: MandelbrotConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn with_resolution(&self, resolution: Resolution) -> Result<Self> {
        Self::new(self.region, resolution, self.max_iterations)
    }

    /// Next load round: each of width, height and max_iterations grows by
    /// `floor(value * load_amount)`.
    pub fn scaled(&self, load_amount: f64) -> Result<Self> {
        let grow_usize = |v: usize| v + (v as f64 * load_amount) as usize;
        let grow_u32 = |v: u32| v + (v as f64 * load_amount) as u32;
        let resolution = Resolution {
            width: grow_usize(self.resolution.width),
            height: grow_usize(self.resolution.height),
            require_square: self.resolution.require_square,
        };
        Self::new(self.region, resolution, grow_u32(self.max_iterations))
    }

    /// `rounds` configs starting at `self`, each scaled from the previous one.
    pub fn load_schedule(&self, load_amount: f64, rounds: usize) -> Result<Vec<Self>> {
        let mut schedule = Vec::with_capacity(rounds);
        let mut current = *self;
        for round in 0..rounds {
            if round > 0 {
                current = current.scaled(load_amount)?;
            }
            schedule.push(current);
        }
        Ok(schedule)
    }
}

impl Default for MandelbrotConfig {
    fn default() -> Self {
        MandelbrotConfig {
            region: Region::default(),
            resolution: Resolution::default(),
            max_iterations: default_max_iterations(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_view() {
        let config = MandelbrotConfig::default();
        assert_eq!(config.region, Region { x_min: -2.0, x_max: 0.5, y_min: -1.2, y_max: 1.2 });
        assert_eq!(config.resolution.points(), 1_000_000);
        assert_eq!(config.max_iterations, 80);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn region_errors_name_the_axis() {
        let err = Region::new(1.0, 1.0, -1.0, 1.0).unwrap_err();
        assert!(matches!(err, MandelbrotError::InvalidRegion { axis: 'x', .. }));
        assert!(err.to_string().contains("x_min"));

        let err = Region::new(-1.0, 1.0, 2.0, -2.0).unwrap_err();
        assert!(matches!(err, MandelbrotError::InvalidRegion { axis: 'y', .. }));

        assert!(Region::new(f64::NAN, 1.0, -1.0, 1.0).is_err());
    }

    #[test]
    fn infinite_bounds_rejected() {
        let err = Region::new(f64::NEG_INFINITY, 1.0, -1.0, 1.0).unwrap_err();
        assert!(matches!(err, MandelbrotError::InvalidRegion { axis: 'x', .. }));
        let err = Region::new(-1.0, 1.0, -1.0, f64::INFINITY).unwrap_err();
        assert!(matches!(err, MandelbrotError::InvalidRegion { axis: 'y', .. }));

        let config = MandelbrotConfig {
            region: Region { x_min: -2.0, x_max: f64::INFINITY, y_min: -1.0, y_max: 1.0 },
            ..MandelbrotConfig::default()
        };
        assert!(matches!(config.validate(), Err(MandelbrotError::InvalidRegion { .. })));
    }

    #[test]
    fn resolution_rejects_zero_and_non_square() {
        let err = Resolution::new(0, 0).unwrap_err();
        assert!(err.to_string().contains("width"));
        let err = Resolution::new(10, 0).unwrap_err();
        assert!(err.to_string().contains("height"));
        let err = Resolution::new(10, 20).unwrap_err();
        assert!(err.to_string().contains("equal"));
        assert!(Resolution::new_unchecked_aspect(10, 20).is_ok());
    }

    #[test]
    fn zero_iterations_rejected() {
        let err = MandelbrotConfig::new(Region::default(), Resolution::default(), 0).unwrap_err();
        assert!(matches!(err, MandelbrotError::InvalidIterationBound(0)));
        assert!(err.to_string().contains("max_iterations"));
    }

    #[test]
    fn scaling_builds_a_new_config() {
        let base = MandelbrotConfig::new(Region::default(), Resolution::square(1000).unwrap(), 80).unwrap();
        let next = base.scaled(0.2).unwrap();
        assert_eq!(next.resolution.width, 1200);
        assert_eq!(next.resolution.height, 1200);
        assert_eq!(next.max_iterations, 96);
        assert_eq!(base.resolution.width, 1000);
    }

    #[test]
    fn schedule_starts_at_the_base() {
        let base = MandelbrotConfig::new(Region::default(), Resolution::square(10).unwrap(), 10).unwrap();
        let schedule = base.load_schedule(0.5, 3).unwrap();
        let widths: Vec<usize> = schedule.iter().map(|c| c.resolution.width).collect();
        assert_eq!(widths, vec![10, 15, 22]);
        let iters: Vec<u32> = schedule.iter().map(|c| c.max_iterations).collect();
        assert_eq!(iters, vec![10, 15, 22]);
    }

    #[test]
    fn json_config_is_validated() {
        let json = r#"{
            "region": { "x_min": -1.0, "x_max": 1.0, "y_min": -1.0, "y_max": 1.0 },
            "resolution": { "width": 64, "height": 64 },
            "max_iterations": 200
        }"#;
        let config = MandelbrotConfig::from_json_str(json).unwrap();
        assert_eq!(config.resolution.width, 64);
        assert!(config.resolution.require_square);

        let bad = r#"{ "max_iterations": 0 }"#;
        assert!(matches!(
            MandelbrotConfig::from_json_str(bad),
            Err(MandelbrotError::InvalidIterationBound(0))
        ));

        assert!(matches!(MandelbrotConfig::from_json_str("{ nope"), Err(MandelbrotError::Config(_))));
    }
}

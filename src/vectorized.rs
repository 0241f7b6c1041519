// Whole-grid iteration: every step runs over all lanes at once, with an
// activity mask keeping escaped lanes frozen.

use crate::fractal::ESCAPE_RADIUS_SQ;
use crate::grid::{ResultGrid, SampleGrid};

/// Per-lane state for the bulk iteration, stored as parallel arrays.
struct Lanes {
    c_re: Vec<f64>,
    c_im: Vec<f64>,
    z_re: Vec<f64>,
    z_im: Vec<f64>,
    counts: Vec<u32>,
    active: Vec<bool>,
}

impl Lanes {
    fn new(samples: &SampleGrid) -> Self {
        let n = samples.len();
        let mut c_re = Vec::with_capacity(n);
        let mut c_im = Vec::with_capacity(n);
        for c in samples.points() {
            c_re.push(c.re);
            c_im.push(c.im);
        }
        Lanes {
            c_re,
            c_im,
            z_re: vec![0.0; n],
            z_im: vec![0.0; n],
            counts: vec![0; n],
            active: vec![true; n],
        }
    }

    /// Recomputes the mask from |z|^2 and returns how many lanes are still bounded.
    fn refresh_mask(&mut self) -> usize {
        let mut live = 0;
        for ((active, re), im) in self.active.iter_mut().zip(&self.z_re).zip(&self.z_im) {
            *active = re * re + im * im <= ESCAPE_RADIUS_SQ;
            live += *active as usize;
        }
        live
    }

    /// Advances every active lane by one step and records `survived` as its count.
    fn step(&mut self, survived: u32) {
        let lanes = self.active.iter()
            .zip(self.z_re.iter_mut())
            .zip(self.z_im.iter_mut())
            .zip(self.c_re.iter().zip(&self.c_im))
            .zip(self.counts.iter_mut());

        for ((((&active, re), im), (&c_re, &c_im)), count) in lanes {
            if !active { continue; }
            *count = survived;
            let re2 = *re * *re;
            let im2 = *im * *im;
            *im = 2.0 * *re * *im + c_im;
            *re = re2 - im2 + c_re;
        }
    }
}

/// Bulk masked computation.
///
/// A lane still bounded at step `t` records `t + 1`, so a lane that first
/// exceeds the radius at step `n` ends with `n` and a lane that never does ends
/// with `max_iterations`. This lines up exactly with `mandelbrot_escapes`.
pub fn compute(samples: &SampleGrid, max_iterations: u32) -> ResultGrid {
    let mut lanes = Lanes::new(samples);
    for t in 0..max_iterations {
        if lanes.refresh_mask() == 0 {
            break;
        }
        lanes.step(t + 1);
    }
    ResultGrid::from_counts(samples.width(), samples.height(), max_iterations, lanes.counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Region, Resolution};
    use crate::fractal::mandelbrot_escapes;

    #[test]
    fn lanes_match_the_point_evaluator() {
        let region = Region::new(-2.1, 0.7, -1.3, 1.3).unwrap();
        let samples = SampleGrid::new(&region, &Resolution::square(31).unwrap());
        let grid = compute(&samples, 60);
        for i in 0..samples.width() {
            for j in 0..samples.height() {
                assert_eq!(grid.get(i, j), mandelbrot_escapes(samples.point(i, j), 60), "({}, {})", i, j);
            }
        }
    }

    #[test]
    fn step_zero_escape_is_not_confused_with_interior() {
        // A 1x1 grid on c = 0 stays bounded: count must be the bound, not 0 or bound - 1
        let region = Region::new(0.0, 1.0, 0.0, 1.0).unwrap();
        let samples = SampleGrid::new(&region, &Resolution::square(1).unwrap());
        assert_eq!(compute(&samples, 7).counts(), &[7]);
    }

    #[test]
    fn all_escaped_grid_stops_early_with_correct_counts() {
        let region = Region::new(3.0, 4.0, 3.0, 4.0).unwrap();
        let samples = SampleGrid::new(&region, &Resolution::square(4).unwrap());
        let grid = compute(&samples, 1000);
        assert!(grid.counts().iter().all(|&n| n == 1));
    }
}

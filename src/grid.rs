use crate::config::{Region, Resolution};
use crate::math::C;

/// `n` evenly spaced values over `[start, stop]`, both endpoints included.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            // Pin the endpoint so rounding in `i * step` cannot overshoot or fall short
            values[n - 1] = stop;
            values
        }
    }
}

/// Axis coordinates of the sample grid. Point `(i, j)` is `real[i] + imag[j]·i`.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleGrid {
    pub real: Vec<f64>,
    pub imag: Vec<f64>,
}

impl SampleGrid {
    pub fn new(region: &Region, resolution: &Resolution) -> Self {
        SampleGrid {
            real: linspace(region.x_min, region.x_max, resolution.width),
            imag: linspace(region.y_min, region.y_max, resolution.height),
        }
    }

    pub fn width(&self) -> usize {
        self.real.len()
    }

    pub fn height(&self) -> usize {
        self.imag.len()
    }

    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn point(&self, i: usize, j: usize) -> C {
        C::new(self.real[i], self.imag[j])
    }

    /// Point at a flat index, in the same order as `ResultGrid` storage.
    #[inline]
    pub fn flat_point(&self, index: usize) -> C {
        let height = self.height();
        self.point(index / height, index % height)
    }

    /// Every point, real index outermost.
    pub fn points(&self) -> impl Iterator<Item = C> + '_ {
        self.real.iter().flat_map(move |&re| self.imag.iter().map(move |&im| C::new(re, im)))
    }

    /// Grid index of the sample closest to `(re, im)`.
    pub fn nearest(&self, re: f64, im: f64) -> (usize, usize) {
        (nearest_index(&self.real, re), nearest_index(&self.imag, im))
    }
}

fn nearest_index(axis: &[f64], value: f64) -> usize {
    axis.iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (**a - value).abs().total_cmp(&(**b - value).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Escape counts laid out `width x height`, indexed like `SampleGrid`.
///
/// A value of `max_iterations` means the point never escaped; every smaller
/// value is the iteration at which it did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultGrid {
    width: usize,
    height: usize,
    max_iterations: u32,
    counts: Vec<u32>,
}

impl ResultGrid {
    pub fn from_counts(width: usize, height: usize, max_iterations: u32, counts: Vec<u32>) -> Self {
        assert_eq!(counts.len(), width * height, "count buffer does not match grid shape");
        ResultGrid { width, height, max_iterations, counts }
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn max_iterations(&self) -> u32 { self.max_iterations }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> u32 {
        self.counts[i * self.height + j]
    }

    pub fn escaped(&self, i: usize, j: usize) -> bool {
        self.get(i, j) < self.max_iterations
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Copy with non-escaping points set to 0, the old plotting convention.
    /// Interior points become indistinguishable from points that escape at step 0.
    pub fn interior_as_zero(&self) -> ResultGrid {
        let max = self.max_iterations;
        ResultGrid {
            counts: self.counts.iter().map(|&n| if n == max { 0 } else { n }).collect(),
            ..self.clone()
        }
    }
}

// Worker-pool strategies. Each call builds its own scoped pool; the pool's
// threads are joined before the call returns, on success and on failure.

use std::any::Any;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace};

use crate::error::{MandelbrotError, Result};
use crate::fractal::mandelbrot_escapes;
use crate::grid::{ResultGrid, SampleGrid};
use crate::math::C;

/// Worker count, bounded by the hardware concurrency.
pub fn pool_size() -> usize {
    thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(1)
}

/// Splits `0..len` into at most `parts` contiguous, non-empty ranges whose
/// sizes differ by at most one. Every index lands in exactly one range.
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let parts = parts.clamp(1, len);
    let base = len / parts;
    let extra = len % parts;
    let mut start = 0;
    (0..parts)
        .map(|k| {
            let size = base + usize::from(k < extra);
            let range = start..start + size;
            start += size;
            range
        })
        .collect()
}

/// Runs `f` against a pool of `size` threads that lives only for the call.
pub fn with_pool<R, F>(size: usize, f: F) -> Result<R>
where
    F: FnOnce(&ThreadPool) -> R,
{
    with_tracked_pool(size, f).map(|(result, _)| result)
}

/// `with_pool`, also returning how many workers were still running once the pool returned.
pub(crate) fn with_tracked_pool<R, F>(size: usize, f: F) -> Result<(R, usize)>
where
    F: FnOnce(&ThreadPool) -> R,
{
    let live = Arc::new(AtomicUsize::new(0));
    let started = Arc::clone(&live);
    let exited = Arc::clone(&live);

    debug!(size, "starting worker pool");
    let result = ThreadPoolBuilder::new()
        .num_threads(size)
        .thread_name(|i| format!("mandelbrot-worker-{}", i))
        .start_handler(move |_| { started.fetch_add(1, Ordering::SeqCst); })
        .exit_handler(move |worker| {
            exited.fetch_sub(1, Ordering::SeqCst);
            trace!(worker, "worker exited");
        })
        .build_scoped(|thread| thread.run(), f)
        .map_err(|e| MandelbrotError::WorkerPool(e.to_string()))?;

    let remaining = live.load(Ordering::SeqCst);
    debug!(size, remaining, "worker pool joined");
    Ok((result, remaining))
}

/// Runs one unit of work, turning a panic into a `WorkerFailure` for `worker`.
fn guarded<T>(worker: usize, work: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(work)).map_err(|payload| MandelbrotError::WorkerFailure {
        worker,
        message: panic_message(payload.as_ref()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Flattened points, one contiguous partition per worker.
pub fn compute_points(samples: &SampleGrid, max_iterations: u32) -> Result<ResultGrid> {
    compute_points_with(samples, max_iterations, pool_size(), mandelbrot_escapes)
}

pub(crate) fn compute_points_with<F>(
    samples: &SampleGrid,
    max_iterations: u32,
    workers: usize,
    escapes: F,
) -> Result<ResultGrid>
where
    F: Fn(C, u32) -> u32 + Sync,
{
    let mut counts = vec![0u32; samples.len()];
    let ranges = partition(samples.len(), workers);

    // Hand each worker the slice of `counts` its range covers
    let mut slices = Vec::with_capacity(ranges.len());
    let mut rest = counts.as_mut_slice();
    for range in &ranges {
        let (head, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
        slices.push(head);
        rest = tail;
    }

    with_pool(workers, |pool| {
        pool.install(|| {
            slices.into_par_iter()
                .zip(ranges.into_par_iter())
                .enumerate()
                .try_for_each(|(worker, (out, range))| {
                    guarded(worker, || {
                        for (slot, index) in out.iter_mut().zip(range) {
                            *slot = escapes(samples.flat_point(index), max_iterations);
                        }
                    })
                })
        })
    })??;

    Ok(ResultGrid::from_counts(samples.width(), samples.height(), max_iterations, counts))
}

/// One task per real-axis column, scheduled across the pool.
pub fn compute_rows(samples: &SampleGrid, max_iterations: u32) -> Result<ResultGrid> {
    compute_rows_with(samples, max_iterations, pool_size(), mandelbrot_escapes)
}

pub(crate) fn compute_rows_with<F>(
    samples: &SampleGrid,
    max_iterations: u32,
    workers: usize,
    escapes: F,
) -> Result<ResultGrid>
where
    F: Fn(C, u32) -> u32 + Sync,
{
    let height = samples.height();
    let mut counts = vec![0u32; samples.len()];
    if counts.is_empty() {
        return Ok(ResultGrid::from_counts(samples.width(), height, max_iterations, counts));
    }

    with_pool(workers, |pool| {
        pool.install(|| {
            counts.par_chunks_mut(height)
                .enumerate()
                .try_for_each(|(i, column)| {
                    guarded(i, || {
                        let re = samples.real[i];
                        for (slot, &im) in column.iter_mut().zip(&samples.imag) {
                            *slot = escapes(C::new(re, im), max_iterations);
                        }
                    })
                })
        })
    })??;

    Ok(ResultGrid::from_counts(samples.width(), height, max_iterations, counts))
}

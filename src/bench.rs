use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::config::MandelbrotConfig;
use crate::error::{MandelbrotError, Result};
use crate::grid::SampleGrid;
use crate::strategy::Strategy;

/// Mean wall-clock time of one strategy at one problem size
#[derive(Clone, Debug, Serialize)]
pub struct BenchmarkRecord {
    pub strategy: Strategy,
    pub label: &'static str,
    pub width: usize,
    pub height: usize,
    pub max_iterations: u32,
    pub runs: usize,
    pub mean_seconds: f64,
}

/// All records for one configuration in an increasing-load sweep
#[derive(Clone, Debug, Serialize)]
pub struct LoadRound {
    pub round: usize,
    pub config: MandelbrotConfig,
    pub records: Vec<BenchmarkRecord>,
}

pub fn time_once(strategy: Strategy, config: &MandelbrotConfig) -> Result<Duration> {
    let start = Instant::now();
    strategy.compute(config)?;
    Ok(start.elapsed())
}

pub fn mean_time(strategy: Strategy, config: &MandelbrotConfig, runs: usize) -> Result<Duration> {
    if runs == 0 {
        return Err(MandelbrotError::InvalidRuns);
    }
    let mut total = Duration::ZERO;
    for _ in 0..runs {
        total += time_once(strategy, config)?;
    }
    Ok(total / runs as u32)
}

#[derive(Clone, Debug)]
pub struct Benchmark {
    pub strategies: Vec<Strategy>,
    pub runs: usize,
}

impl Default for Benchmark {
    fn default() -> Self {
        Benchmark { strategies: Strategy::ALL.to_vec(), runs: 5 }
    }
}

impl Benchmark {
    pub fn new(strategies: Vec<Strategy>, runs: usize) -> Result<Self> {
        if runs == 0 {
            return Err(MandelbrotError::InvalidRuns);
        }
        Ok(Benchmark { strategies, runs })
    }

    pub fn measure(&self, strategy: Strategy, config: &MandelbrotConfig) -> Result<BenchmarkRecord> {
        let mean = mean_time(strategy, config, self.runs)?;
        let record = BenchmarkRecord {
            strategy,
            label: strategy.label(),
            width: config.resolution.width,
            height: config.resolution.height,
            max_iterations: config.max_iterations,
            runs: self.runs,
            mean_seconds: mean.as_secs_f64(),
        };
        info!(strategy = strategy.id(), mean_seconds = record.mean_seconds, "benchmarked");
        Ok(record)
    }

    /// Every registered strategy, in order, against one config.
    pub fn run_once(&self, config: &MandelbrotConfig) -> Result<Vec<BenchmarkRecord>> {
        config.validate()?;
        self.strategies.iter().map(|&s| self.measure(s, config)).collect()
    }

    /// `rounds` configs, each grown from the one before by `load_amount`.
    pub fn run_increasing_load(
        &self,
        config: &MandelbrotConfig,
        load_amount: f64,
        rounds: usize,
    ) -> Result<Vec<LoadRound>> {
        let schedule = config.load_schedule(load_amount, rounds)?;
        let mut results = Vec::with_capacity(schedule.len());
        for (round, config) in schedule.into_iter().enumerate() {
            info!(
                round,
                width = config.resolution.width,
                height = config.resolution.height,
                max_iterations = config.max_iterations,
                "load round"
            );
            let records = self.run_once(&config)?;
            results.push(LoadRound { round, config, records });
        }
        Ok(results)
    }
}

/// `label<TAB><TAB>seconds s`, or just the seconds when `noisy` is off.
pub fn format_record(record: &BenchmarkRecord, noisy: bool) -> String {
    if noisy {
        format!("{}\t\t{}s", record.label, record.mean_seconds)
    } else {
        format!("{}", record.mean_seconds)
    }
}

pub fn format_round_header(config: &MandelbrotConfig) -> String {
    format!(
        "{} x {} : {} iterations",
        config.resolution.width, config.resolution.height, config.max_iterations
    )
}

/// Per-phase timings of a single run
#[derive(Clone, Debug, Serialize)]
pub struct Profile {
    pub strategy: Strategy,
    pub points: usize,
    pub escaped: usize,
    pub sampling_seconds: f64,
    pub evaluation_seconds: f64,
}

pub fn profile(strategy: Strategy, config: &MandelbrotConfig) -> Result<Profile> {
    config.validate()?;
    let span = info_span!("profile", strategy = strategy.id());
    let _enter = span.enter();

    let start = Instant::now();
    let samples = SampleGrid::new(&config.region, &config.resolution);
    let sampling = start.elapsed().as_secs_f64();
    debug!(seconds = sampling, points = samples.len(), "grid sampled");

    let start = Instant::now();
    let grid = strategy.compute_samples(&samples, config.max_iterations)?;
    let evaluation = start.elapsed().as_secs_f64();
    debug!(seconds = evaluation, "grid evaluated");

    let escaped = grid.counts().iter().filter(|&&n| n < grid.max_iterations()).count();
    info!(sampling, evaluation, escaped, "profile complete");
    Ok(Profile {
        strategy,
        points: samples.len(),
        escaped,
        sampling_seconds: sampling,
        evaluation_seconds: evaluation,
    })
}

pub fn write_report<T: Serialize + ?Sized, P: AsRef<Path>>(report: &T, path: P) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

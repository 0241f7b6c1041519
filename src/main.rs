use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, warn};

use mandelbrot_bench::bench::{self, Benchmark};
use mandelbrot_bench::{
    visualize, visualize_all, ColorMap, HeatmapOptions, MandelbrotConfig, MandelbrotError, Output, Resolution,
    Result, Strategy,
};

#[derive(Parser)]
#[command(name = "mandelbrot-bench", about = "Compare Mandelbrot set computation strategies")]
struct Cli {
    #[command(flatten)]
    input: InputArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct InputArgs {
    /// JSON file with region, resolution and max_iterations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, allow_negative_numbers = true)]
    x_min: Option<f64>,
    #[arg(long, global = true, allow_negative_numbers = true)]
    x_max: Option<f64>,
    #[arg(long, global = true, allow_negative_numbers = true)]
    y_min: Option<f64>,
    #[arg(long, global = true, allow_negative_numbers = true)]
    y_max: Option<f64>,

    #[arg(long, global = true)]
    width: Option<usize>,
    #[arg(long, global = true)]
    height: Option<usize>,

    #[arg(long, global = true)]
    max_iterations: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Time every strategy once at the configured size
    Bench {
        /// Runs averaged per strategy
        #[arg(long, default_value_t = 5)]
        runs: usize,
        /// Print bare seconds without strategy labels
        #[arg(long)]
        quiet_labels: bool,
        /// Also write the records as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Time every strategy while growing size and iteration bound each round
    Scale {
        #[arg(long, default_value_t = 5)]
        runs: usize,
        /// Fractional growth per round
        #[arg(long, default_value_t = 0.2)]
        load: f64,
        #[arg(long, default_value_t = 20)]
        rounds: usize,
        /// Prefix each timing with its strategy label
        #[arg(long)]
        noisy: bool,
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Render one strategy's result
    Show {
        #[arg(value_enum)]
        strategy: Option<Strategy>,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Render every strategy except the scalar baseline, one after another
    ShowAll {
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Time the phases of a single run
    Profile {
        #[arg(value_enum)]
        strategy: Strategy,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Image side in pixels (overrides --width/--height)
    #[arg(long, default_value_t = 720)]
    size: usize,
    /// Pixels between axis ticks
    #[arg(long, default_value_t = 216)]
    tick_spacing: usize,
    #[arg(long, default_value_t = 0.4)]
    gamma: f64,
    #[arg(long, value_enum, default_value_t = ColorMap::Hot)]
    colormap: ColorMap,
    /// Write PNGs into this directory instead of opening windows
    #[arg(long)]
    save: Option<PathBuf>,
}

impl InputArgs {
    fn resolve(&self) -> Result<MandelbrotConfig> {
        let mut config = match &self.config {
            Some(path) => MandelbrotConfig::from_json_file(path)?,
            None => MandelbrotConfig::default(),
        };
        if let Some(v) = self.x_min { config.region.x_min = v; }
        if let Some(v) = self.x_max { config.region.x_max = v; }
        if let Some(v) = self.y_min { config.region.y_min = v; }
        if let Some(v) = self.y_max { config.region.y_max = v; }
        if let Some(v) = self.width { config.resolution.width = v; }
        if let Some(v) = self.height { config.resolution.height = v; }
        if let Some(v) = self.max_iterations { config.max_iterations = v; }
        config.validate()?;
        Ok(config)
    }
}

impl RenderArgs {
    fn options(&self) -> HeatmapOptions {
        HeatmapOptions {
            gamma: self.gamma,
            colormap: self.colormap,
            tick_spacing: Some(self.tick_spacing),
            ..HeatmapOptions::default()
        }
    }

    fn output(&self) -> Result<Output<'_>> {
        match &self.save {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                Ok(Output::Directory(dir))
            }
            None => Ok(Output::Window),
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.input.resolve()?;

    match cli.command {
        Command::Bench { runs, quiet_labels, report } => {
            let records = Benchmark::new(Strategy::ALL.to_vec(), runs)?.run_once(&config)?;
            for record in &records {
                println!("{}", bench::format_record(record, !quiet_labels));
            }
            if let Some(path) = report {
                bench::write_report(&records, path)?;
            }
        }
        Command::Scale { runs, load, rounds, noisy, report } => {
            let rounds = Benchmark::new(Strategy::ALL.to_vec(), runs)?
                .run_increasing_load(&config, load, rounds)?;
            for round in &rounds {
                println!("{}", bench::format_round_header(&round.config));
                for record in &round.records {
                    println!("{}", bench::format_record(record, noisy));
                }
            }
            if let Some(path) = report {
                bench::write_report(&rounds, path)?;
            }
        }
        Command::Show { strategy, render } => {
            let config = config.with_resolution(Resolution::square(render.size)?)?;
            let strategy = strategy.unwrap_or_else(Strategy::fastest);
            visualize(strategy, &config, &render.options(), &render.output()?)?;
        }
        Command::ShowAll { render } => {
            let config = config.with_resolution(Resolution::square(render.size)?)?;
            visualize_all(&config, &render.options(), &render.output()?)?;
        }
        Command::Profile { strategy } => {
            let profile = bench::profile(strategy, &config)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Structured logging on stderr with env-based filter; profiling defaults to debug
    let default_level = match cli.command {
        Command::Profile { .. } => "debug",
        _ => "info",
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .try_init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e {
                MandelbrotError::InvalidRegion { .. }
                | MandelbrotError::InvalidResolution { .. }
                | MandelbrotError::InvalidIterationBound(_)
                | MandelbrotError::InvalidRuns => warn!("{}", e),
                _ => error!("{}", e),
            }
            ExitCode::FAILURE
        }
    }
}

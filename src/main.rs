use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use eddy_io::{encode::EncodingError, DecodingError};
use eddy_sph::ConfigError;

mod inspect;
mod run;

/// Smoothed-particle fluid simulator that records its frames to disk.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Simulate a block of fluid and record every frame.
    Run(RunArgs),
    /// Print a per-frame summary of a recording.
    Inspect {
        /// Directory written by `eddy run`.
        dir: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Number of spatial dimensions.
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(2..=3))]
    pub dim: u8,
    /// Directory to record into. Must not exist yet.
    #[arg(short, long)]
    pub output: PathBuf,
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,
    /// Simulated duration.
    #[arg(long, default_value_t = 10.0)]
    pub seconds: f32,
    /// Side length of the initial particle block, in particles. Defaults to 40 in 2D and 16
    /// in 3D.
    #[arg(long)]
    pub particles_per_axis: Option<usize>,
    /// Pipeline steps per recorded frame.
    #[arg(long, default_value_t = 1)]
    pub substeps: usize,
    /// Use a tilted container instead of the axis-aligned box.
    #[arg(long)]
    pub oriented: bool,
    /// Attract particles toward this point, e.g. `--cursor 1.5,-2`.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub cursor: Option<Vec<f32>>,
    #[arg(long, default_value_t = 2.0)]
    pub cursor_radius: f32,
    /// Negative values repel.
    #[arg(long, default_value_t = 30.0, allow_hyphen_values = true)]
    pub cursor_strength: f32,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid simulation parameters: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to write recording: {0}")]
    Encoding(#[from] EncodingError),
    #[error("failed to read recording: {0}")]
    Decoding(#[from] DecodingError),
    #[error("cursor has {got} components but the simulation is {expected}D")]
    CursorDimension { expected: usize, got: usize },
    #[error("{per_axis} particles per axis is too many for a {dim}D block")]
    TooManyParticles { per_axis: usize, dim: usize },
    #[error(transparent)]
    ProgressTemplate(#[from] indicatif::style::TemplateError),
}

fn main() -> Result<(), RunError> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run::run(&args),
        Command::Inspect { dir } => inspect::inspect(dir),
    }
}

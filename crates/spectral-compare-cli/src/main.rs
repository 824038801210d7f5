//! spectral-compare CLI - spectral similarity tool

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::MetricArgs;

/// Compare spectra from files or hyperspectral cubes.
#[derive(Parser)]
#[command(name = "spectral-compare")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (also enables debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two series loaded from CSV or JSON files
    Compare {
        /// Reference series file
        #[arg(short, long)]
        reference: PathBuf,

        /// Target series file
        #[arg(short, long)]
        target: PathBuf,

        #[command(flatten)]
        metric: MetricArgs,

        /// Output JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare two regions of a hyperspectral cube stored as .npy
    Cube {
        /// Cube file (.npy, 3-D)
        #[arg(long)]
        cube: PathBuf,

        /// Memory layout of the cube (auto, chw, hwc)
        #[arg(long, default_value = "auto")]
        layout: String,

        /// Reference rectangle as x,y,width,height
        #[arg(long)]
        reference_roi: String,

        /// Target rectangle as x,y,width,height
        #[arg(long)]
        target_roi: String,

        /// Wavelength axis as a JSON array of numbers
        #[arg(long)]
        wavelengths: Option<PathBuf>,

        /// Evaluate every pixel pair instead of the averaged spectra
        #[arg(long)]
        per_pixel: bool,

        #[command(flatten)]
        metric: MetricArgs,

        /// Output JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Rank library spectra by similarity to a reference
    Rank {
        /// Reference series file
        #[arg(short, long)]
        reference: PathBuf,

        /// Library files or directories of .csv/.json series
        #[arg(required = true)]
        library: Vec<PathBuf>,

        /// Number of matches to print
        #[arg(long, default_value = "10")]
        top: usize,

        /// Write the full ranking as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        #[command(flatten)]
        metric: MetricArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Compare {
            reference,
            target,
            metric,
            output,
        } => commands::compare::run(reference, target, &metric, output, cli.verbose),
        Commands::Cube {
            cube,
            layout,
            reference_roi,
            target_roi,
            wavelengths,
            per_pixel,
            metric,
            output,
        } => commands::cube::run(
            commands::cube::CubeArgs {
                cube,
                layout,
                reference_roi,
                target_roi,
                wavelengths,
                per_pixel,
                output,
            },
            &metric,
            cli.verbose,
        ),
        Commands::Rank {
            reference,
            library,
            top,
            csv,
            metric,
        } => commands::rank::run(reference, library, top, csv, &metric, cli.verbose),
    }
}

//! matvec: command-line front end for matvec-linalg.
//!
//! CLI entry point using clap for argument parsing.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "matvec",
    version,
    about = "Dense linear algebra kernels: LU, Gauss-Jordan, matrix exponential, sparse packing",
    long_about = "Reads matrices from plain-text (`nrows ncols` header, one row per line)\n\
                   or JSON files and runs the matvec-linalg kernels on them."
)]
struct Cli {
    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve A x = b
    Solve(commands::solve::SolveArgs),

    /// Invert a square matrix
    Invert(commands::solve::InvertArgs),

    /// Compute the matrix exponential e^A
    Expm(commands::expm::ExpmArgs),

    /// Pack a dense matrix into the in-place sparse row encoding
    Pack(commands::sparse::PackArgs),

    /// Expand a packed matrix back to dense form
    Unpack(commands::sparse::UnpackArgs),

    /// Validate the structure of a packed matrix
    CheckSparse(commands::sparse::CheckSparseArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("matvec v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Solve(args) => commands::solve::run_solve(args),
        Commands::Invert(args) => commands::solve::run_invert(args),
        Commands::Expm(args) => commands::expm::run(args),
        Commands::Pack(args) => commands::sparse::run_pack(args),
        Commands::Unpack(args) => commands::sparse::run_unpack(args),
        Commands::CheckSparse(args) => commands::sparse::run_check(args),
    }
}

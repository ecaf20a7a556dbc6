//! Matrix exponential.
//!
//! matvec expm --matrix A.mat --eps 1e-12

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use matvec_linalg::MatrixExp;

use super::{read_matrix_file, write_matrix_output};

#[derive(Args)]
pub struct ExpmArgs {
    /// Square matrix file
    #[arg(long)]
    matrix: PathBuf,

    /// Stop when the Frobenius norm of the latest series term is below this
    #[arg(long, default_value = "1e-12")]
    eps: f64,

    /// Maximum number of series terms
    #[arg(long, default_value = "1000")]
    max_terms: usize,

    /// Write the result here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn run(args: ExpmArgs) -> Result<()> {
    let a = read_matrix_file(&args.matrix)?;
    info!(
        "Computing e^A for {}x{} matrix (eps {:.1e}, at most {} terms)",
        a.nrows(),
        a.ncols(),
        args.eps,
        args.max_terms
    );
    let result = MatrixExp::new(args.eps, args.max_terms).compute(&a)?;
    write_matrix_output(args.output.as_deref(), &result)
}

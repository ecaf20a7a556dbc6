//! Sparse row packing.
//!
//! matvec pack --matrix A.mat --output P.mat
//! matvec unpack --matrix P.mat --output A.mat
//! matvec check-sparse --matrix P.mat

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use matvec_linalg::sparse::{
    check_sparse_row, is_sparse, make_sparse, max_nonzeros, sparse_sanity, unsparse,
};

use super::{read_matrix_file, write_matrix_output};

#[derive(Args)]
pub struct PackArgs {
    /// Dense matrix file
    #[arg(long)]
    matrix: PathBuf,

    /// Output file for the packed matrix (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct UnpackArgs {
    /// Packed matrix file
    #[arg(long)]
    matrix: PathBuf,

    /// Output file for the dense matrix (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct CheckSparseArgs {
    /// Packed matrix file
    #[arg(long)]
    matrix: PathBuf,
}

pub fn run_pack(args: PackArgs) -> Result<()> {
    let mut a = read_matrix_file(&args.matrix)?;
    info!(
        "Packing {}x{} matrix (at most {} non-zeros per row)",
        a.nrows(),
        a.ncols(),
        max_nonzeros(a.ncols())
    );
    make_sparse(&mut a)?;
    write_matrix_output(args.output.as_deref(), &a)
}

pub fn run_unpack(args: UnpackArgs) -> Result<()> {
    let mut a = read_matrix_file(&args.matrix)?;
    unsparse(&mut a)?;
    write_matrix_output(args.output.as_deref(), &a)
}

pub fn run_check(args: CheckSparseArgs) -> Result<()> {
    let a = read_matrix_file(&args.matrix)?;
    if !is_sparse(&a) {
        bail!("{} is not a packed sparse matrix", args.matrix.display());
    }
    if !sparse_sanity(&a) {
        for i in 0..a.nrows() {
            if let Err(reason) = check_sparse_row(a.row(i)) {
                bail!("Row {}: {}", i, reason);
            }
        }
    }
    println!("{}: valid packed matrix ({}x{})", args.matrix.display(), a.nrows(), a.ncols());
    Ok(())
}

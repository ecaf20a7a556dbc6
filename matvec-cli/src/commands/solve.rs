//! Linear solves and inversion.
//!
//! matvec solve --matrix A.mat --rhs b.vec [--method lu|gauss-jordan]
//! matvec invert --matrix A.mat [--output Ainv.mat]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use matvec_linalg::decomposition::{self, LuDecomp};
use matvec_linalg::io::{format_vector, load_vector, save_vector};
use matvec_linalg::{DenseMatrix, GaussJordan};

use super::{read_matrix_file, write_matrix_output};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Method {
    /// Doolittle LU without pivoting
    Lu,
    /// Gauss-Jordan with partial pivoting
    GaussJordan,
}

#[derive(Args)]
pub struct SolveArgs {
    /// Coefficient matrix file
    #[arg(long)]
    matrix: PathBuf,

    /// Right-hand side vector file
    #[arg(long)]
    rhs: PathBuf,

    /// Solution method
    #[arg(long, value_enum, default_value = "gauss-jordan")]
    method: Method,

    /// Pivot tolerance relative to the pivot row's largest entry
    #[arg(long, default_value_t = decomposition::DEFAULT_PIVOT_TOL)]
    pivot_tol: f64,

    /// Write the solution here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
pub struct InvertArgs {
    /// Matrix file
    #[arg(long)]
    matrix: PathBuf,

    /// Inversion method
    #[arg(long, value_enum, default_value = "gauss-jordan")]
    method: Method,

    /// Pivot tolerance relative to the pivot row's largest entry
    #[arg(long, default_value_t = decomposition::DEFAULT_PIVOT_TOL)]
    pivot_tol: f64,

    /// Write the inverse here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn solve_system(a: &DenseMatrix, b: &[f64], method: Method, pivot_tol: f64) -> Result<Vec<f64>> {
    let x = match method {
        Method::Lu => LuDecomp::with_tol(a, pivot_tol)?.solve(b)?,
        Method::GaussJordan => {
            let mut inv = a.clone();
            let mut rhs = DenseMatrix::try_from_vec(b.len(), 1, b.to_vec())?;
            GaussJordan::new(pivot_tol).solve(&mut inv, &mut rhs)?;
            rhs.into_vec()
        }
    };
    Ok(x)
}

pub fn invert_matrix(a: &DenseMatrix, method: Method, pivot_tol: f64) -> Result<DenseMatrix> {
    let inv = match method {
        Method::Lu => LuDecomp::with_tol(a, pivot_tol)?.inverse()?,
        Method::GaussJordan => {
            let mut inv = a.clone();
            GaussJordan::new(pivot_tol).invert(&mut inv)?;
            inv
        }
    };
    Ok(inv)
}

pub fn run_solve(args: SolveArgs) -> Result<()> {
    let a = read_matrix_file(&args.matrix)?;
    let b = load_vector(&args.rhs)
        .with_context(|| format!("Failed to load vector {}", args.rhs.display()))?;
    info!("Solving {}x{} system with {:?}", a.nrows(), a.ncols(), args.method);

    let x = solve_system(&a, &b, args.method, args.pivot_tol)?;

    match args.output {
        Some(path) => save_vector(&path, &x)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", format_vector(&x)),
    }
    Ok(())
}

pub fn run_invert(args: InvertArgs) -> Result<()> {
    let a = read_matrix_file(&args.matrix)?;
    info!("Inverting {}x{} matrix with {:?}", a.nrows(), a.ncols(), args.method);
    let inv = invert_matrix(&a, args.method, args.pivot_tol)?;
    write_matrix_output(args.output.as_deref(), &inv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methods_agree() {
        let a = DenseMatrix::from_row_major(2, 2, &[3.0, 1.0, 1.0, 2.0]);
        let b = [9.0, 8.0];
        let x_lu = solve_system(&a, &b, Method::Lu, 1e-12).unwrap();
        let x_gj = solve_system(&a, &b, Method::GaussJordan, 1e-12).unwrap();
        for i in 0..2 {
            assert!((x_lu[i] - x_gj[i]).abs() < 1e-12);
        }
        // x = [2, 3]
        assert!((x_gj[0] - 2.0).abs() < 1e-12);
        assert!((x_gj[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_only_gauss_jordan_pivots() {
        let a = DenseMatrix::from_row_major(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        assert!(invert_matrix(&a, Method::Lu, 1e-12).is_err());
        let inv = invert_matrix(&a, Method::GaussJordan, 1e-12).unwrap();
        assert_eq!(inv, a);
    }
}

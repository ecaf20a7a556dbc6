#![allow(clippy::needless_range_loop)]
//! LU factorization and triangular solves.
//!
//! Doolittle decomposition without pivoting: `A = L * U` with `L` unit
//! lower-triangular. Callers with matrices that need row exchanges should
//! use [`crate::gauss_jordan`] instead.

use tracing::{debug, warn};

use crate::dense::DenseMatrix;
use crate::error::{LinalgError, LinalgResult};

/// Relative magnitude below which a pivot is treated as zero.
///
/// A pivot `p` taken from row `i` is unusable when
/// `|p| <= DEFAULT_PIVOT_TOL * max_j |A[i][j]|`. Measuring against the
/// pivot's own row keeps badly scaled but non-singular matrices solvable.
pub const DEFAULT_PIVOT_TOL: f64 = 1e-12;

/// Absolute pivot threshold for a row whose largest entry is `row_scale`.
pub(crate) fn pivot_threshold(pivot_tol: f64, row_scale: f64) -> f64 {
    pivot_tol * row_scale
}

/// Largest magnitude in each row of `a`.
pub(crate) fn row_scales(a: &DenseMatrix) -> Vec<f64> {
    (0..a.nrows())
        .map(|i| a.row(i).iter().fold(0.0_f64, |m, v| m.max(v.abs())))
        .collect()
}

/// Result of an LU decomposition.
#[derive(Debug, Clone)]
pub struct LuDecomp {
    /// Unit lower-triangular factor.
    pub l: DenseMatrix,
    /// Upper-triangular factor.
    pub u: DenseMatrix,
}

/// Factor `a` in place into compact LU form.
///
/// On success the strict lower triangle holds `L` (its unit diagonal is
/// implicit) and the upper triangle including the diagonal holds `U`.
/// Each entry of `a` is read before the step that overwrites it.
pub fn lu_in_place(a: &mut DenseMatrix) -> LinalgResult<()> {
    lu_in_place_with_tol(a, DEFAULT_PIVOT_TOL)
}

pub fn lu_in_place_with_tol(a: &mut DenseMatrix, pivot_tol: f64) -> LinalgResult<()> {
    let n = a.check_square()?;
    let scales = row_scales(a);

    for k in 0..n {
        // Row k of U.
        for j in k..n {
            let mut sum = 0.0;
            for p in 0..k {
                sum += a.get(k, p) * a.get(p, j);
            }
            a.set(k, j, a.get(k, j) - sum);
        }

        let pivot = a.get(k, k);
        if !(pivot.abs() > pivot_threshold(pivot_tol, scales[k])) {
            warn!("LU: unusable pivot {:.3e} at step {}", pivot, k);
            return Err(LinalgError::SingularMatrix {
                pivot: k,
                value: pivot,
            });
        }

        // Column k of L.
        for i in (k + 1)..n {
            let mut sum = 0.0;
            for p in 0..k {
                sum += a.get(i, p) * a.get(p, k);
            }
            a.set(i, k, (a.get(i, k) - sum) / pivot);
        }
    }
    debug!("LU factorization of {}x{} matrix complete", n, n);
    Ok(())
}

impl LuDecomp {
    /// Compute the LU decomposition of a square matrix.
    pub fn new(a: &DenseMatrix) -> LinalgResult<Self> {
        Self::with_tol(a, DEFAULT_PIVOT_TOL)
    }

    /// Compute the LU decomposition with a custom relative pivot tolerance.
    pub fn with_tol(a: &DenseMatrix, pivot_tol: f64) -> LinalgResult<Self> {
        let mut lu = a.clone();
        lu_in_place_with_tol(&mut lu, pivot_tol)?;
        Ok(Self::split(&lu))
    }

    /// Split a compact LU matrix into separate `L` and `U`.
    pub fn split(lu: &DenseMatrix) -> Self {
        let n = lu.nrows();
        let mut l = DenseMatrix::identity(n);
        let mut u = DenseMatrix::zeros(n, n);
        for i in 0..n {
            for j in 0..n {
                if j < i {
                    l.set(i, j, lu.get(i, j));
                } else {
                    u.set(i, j, lu.get(i, j));
                }
            }
        }
        LuDecomp { l, u }
    }

    pub fn dim(&self) -> usize {
        self.l.nrows()
    }

    /// Solve `L * U * x = b`.
    pub fn solve(&self, b: &[f64]) -> LinalgResult<Vec<f64>> {
        let mut x = b.to_vec();
        self.solve_in_place(&mut x)?;
        Ok(x)
    }

    /// Solve `L * U * x = b`, overwriting `b` with `x`.
    pub fn solve_in_place(&self, b: &mut [f64]) -> LinalgResult<()> {
        forward_subst_in_place(&self.l, b)?;
        back_subst_in_place(&self.u, b)
    }

    /// Compute `A^{-1}` one column at a time from the basis vectors.
    pub fn inverse(&self) -> LinalgResult<DenseMatrix> {
        let n = self.dim();
        let mut inv = DenseMatrix::zeros(n, n);
        let mut e = vec![0.0; n];
        for k in 0..n {
            e.fill(0.0);
            e[k] = 1.0;
            self.solve_in_place(&mut e)?;
            inv.set_col(k, &e);
        }
        Ok(inv)
    }
}

fn check_rhs(n: usize, b: &[f64]) -> LinalgResult<()> {
    if b.len() != n {
        return Err(LinalgError::DimensionMismatch {
            expected: n,
            got: b.len(),
        });
    }
    Ok(())
}

/// Solve `L * y = b` for unit lower-triangular `L`.
///
/// The diagonal of `L` is never read, so a compact LU matrix works too.
pub fn forward_subst(l: &DenseMatrix, b: &[f64]) -> LinalgResult<Vec<f64>> {
    let mut y = b.to_vec();
    forward_subst_in_place(l, &mut y)?;
    Ok(y)
}

/// In-place forward substitution: `b` is overwritten with `y`.
pub fn forward_subst_in_place(l: &DenseMatrix, b: &mut [f64]) -> LinalgResult<()> {
    let n = l.check_square()?;
    check_rhs(n, b)?;
    for i in 0..n {
        let row = l.row(i);
        let mut sum = 0.0;
        for j in 0..i {
            sum += row[j] * b[j];
        }
        b[i] -= sum;
    }
    Ok(())
}

/// Solve `U * x = b` for upper-triangular `U`.
///
/// Only the upper triangle including the diagonal is read.
pub fn back_subst(u: &DenseMatrix, b: &[f64]) -> LinalgResult<Vec<f64>> {
    let mut x = b.to_vec();
    back_subst_in_place(u, &mut x)?;
    Ok(x)
}

/// In-place back substitution: `b` is overwritten with `x`.
pub fn back_subst_in_place(u: &DenseMatrix, b: &mut [f64]) -> LinalgResult<()> {
    let n = u.check_square()?;
    check_rhs(n, b)?;

    for i in (0..n).rev() {
        let row = u.row(i);
        let diag = row[i];
        let scale = row[i..].iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        if !(diag.abs() > pivot_threshold(DEFAULT_PIVOT_TOL, scale)) {
            warn!("Back substitution: unusable diagonal {:.3e} at row {}", diag, i);
            return Err(LinalgError::SingularMatrix {
                pivot: i,
                value: diag,
            });
        }
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += row[j] * b[j];
        }
        b[i] = (b[i] - sum) / diag;
    }
    Ok(())
}

/// Solve `A * x = b` via LU, forward and back substitution.
pub fn solve(a: &DenseMatrix, b: &[f64]) -> LinalgResult<Vec<f64>> {
    let n = a.check_square()?;
    check_rhs(n, b)?;
    let mut lu = a.clone();
    lu_in_place(&mut lu)?;
    let mut x = b.to_vec();
    forward_subst_in_place(&lu, &mut x)?;
    back_subst_in_place(&lu, &mut x)?;
    Ok(x)
}

/// Compute the inverse of a square, non-singular matrix via LU.
pub fn inverse(a: &DenseMatrix) -> LinalgResult<DenseMatrix> {
    LuDecomp::new(a)?.inverse()
}

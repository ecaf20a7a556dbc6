#![allow(clippy::needless_range_loop)]
//! Gauss-Jordan elimination with partial pivoting.
//!
//! Inverts `A` in place while solving `A * X = B` for every column of `B`.
//! In column `k` the row with the largest remaining magnitude is swapped
//! into position, so matrices that LU rejects for a zero leading pivot
//! (e.g. permutations) are handled here.

use tracing::{debug, warn};

use crate::decomposition::{pivot_threshold, row_scales, DEFAULT_PIVOT_TOL};
use crate::dense::DenseMatrix;
use crate::error::{LinalgError, LinalgResult};

/// Gauss-Jordan solver configuration.
#[derive(Debug, Clone)]
pub struct GaussJordan {
    /// Pivot tolerance relative to the candidate row's largest original
    /// entry (see [`DEFAULT_PIVOT_TOL`]).
    pub pivot_tol: f64,
}

impl Default for GaussJordan {
    fn default() -> Self {
        Self {
            pivot_tol: DEFAULT_PIVOT_TOL,
        }
    }
}

impl GaussJordan {
    pub fn new(pivot_tol: f64) -> Self {
        Self { pivot_tol }
    }

    /// On success `a` holds `A^{-1}` and `b` holds `A^{-1} * B`.
    ///
    /// `a` must be `n x n` and `b` must have `n` rows (any number of
    /// columns, including zero). On error the contents of both are
    /// unspecified.
    pub fn solve(&self, a: &mut DenseMatrix, b: &mut DenseMatrix) -> LinalgResult<()> {
        let n = a.check_square()?;
        if b.nrows() != n {
            return Err(LinalgError::DimensionMismatch {
                expected: n,
                got: b.nrows(),
            });
        }
        // Scales travel with their rows through the exchanges.
        let mut scales = row_scales(a);
        let mut swaps: Vec<(usize, usize)> = Vec::with_capacity(n);

        for k in 0..n {
            // Largest candidate among those not negligible for their own row.
            let mut pivot_row = None;
            let mut big = 0.0_f64;
            let mut largest = 0.0_f64;
            for i in k..n {
                let v = a.get(i, k).abs();
                largest = largest.max(v);
                if v > pivot_threshold(self.pivot_tol, scales[i]) && v > big {
                    big = v;
                    pivot_row = Some(i);
                }
            }
            let Some(pivot_row) = pivot_row else {
                warn!("Gauss-Jordan: no usable pivot in column {} (max {:.3e})", k, largest);
                return Err(LinalgError::SingularMatrix {
                    pivot: k,
                    value: largest,
                });
            };
            if pivot_row != k {
                debug!("Gauss-Jordan: swapping rows {} and {}", k, pivot_row);
                a.swap_rows(k, pivot_row);
                b.swap_rows(k, pivot_row);
                scales.swap(k, pivot_row);
            }
            swaps.push((k, pivot_row));

            // Column k of the identity is accumulated in place of A's column k.
            let pivinv = 1.0 / a.get(k, k);
            a.set(k, k, 1.0);
            for v in a.row_mut(k) {
                *v *= pivinv;
            }
            for v in b.row_mut(k) {
                *v *= pivinv;
            }

            for i in 0..n {
                if i == k {
                    continue;
                }
                let factor = a.get(i, k);
                if factor == 0.0 {
                    continue;
                }
                a.set(i, k, 0.0);
                for j in 0..n {
                    let akj = a.get(k, j);
                    a.set(i, j, a.get(i, j) - akj * factor);
                }
                for j in 0..b.ncols() {
                    let bkj = b.get(k, j);
                    b.set(i, j, b.get(i, j) - bkj * factor);
                }
            }
        }

        // `a` now holds (P * A)^{-1}; undoing the row exchanges as column
        // exchanges in reverse order yields A^{-1}.
        for &(k, p) in swaps.iter().rev() {
            a.swap_cols(k, p);
        }
        Ok(())
    }

    /// Invert `a` in place.
    pub fn invert(&self, a: &mut DenseMatrix) -> LinalgResult<()> {
        let mut none = DenseMatrix::zeros(a.nrows(), 0);
        self.solve(a, &mut none)
    }
}

/// Gauss-Jordan with the default pivot tolerance.
///
/// On return `a` holds `A^{-1}` and `b` holds the solutions `A^{-1} * B`.
pub fn gauss_jordan(a: &mut DenseMatrix, b: &mut DenseMatrix) -> LinalgResult<()> {
    GaussJordan::default().solve(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: &DenseMatrix, b: &DenseMatrix, tol: f64) {
        assert_eq!(a.nrows(), b.nrows());
        assert_eq!(a.ncols(), b.ncols());
        for i in 0..a.nrows() {
            for j in 0..a.ncols() {
                assert!(
                    (a.get(i, j) - b.get(i, j)).abs() < tol,
                    "[{},{}]: {} != {}",
                    i,
                    j,
                    a.get(i, j),
                    b.get(i, j)
                );
            }
        }
    }

    #[test]
    fn test_inverse_and_solutions() {
        let a0 = DenseMatrix::from_row_major(3, 3, &[2.0, 1.0, 1.0, 1.0, 3.0, 2.0, 1.0, 0.0, 0.0]);
        let b0 = DenseMatrix::from_row_major(3, 2, &[4.0, 1.0, 5.0, 0.0, 6.0, 2.0]);
        let mut a = a0.clone();
        let mut b = b0.clone();
        gauss_jordan(&mut a, &mut b).unwrap();

        assert_close(&a0.mat_mul(&a).unwrap(), &DenseMatrix::identity(3), 1e-12);
        assert_close(&a0.mat_mul(&b).unwrap(), &b0, 1e-12);
    }

    #[test]
    fn test_handles_zero_leading_pivot() {
        // LU without pivoting fails on this permutation matrix.
        let a0 = DenseMatrix::from_row_major(3, 3, &[0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        let mut a = a0.clone();
        let mut b = DenseMatrix::from_row_major(3, 1, &[1.0, 2.0, 3.0]);
        gauss_jordan(&mut a, &mut b).unwrap();
        assert_close(&a, &a0.transpose(), 1e-15);
        // x = P^T b
        assert_eq!(b.col(0), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_singular_zero_row() {
        let mut a = DenseMatrix::from_row_major(3, 3, &[1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 4.0, 5.0, 6.0]);
        let mut b = DenseMatrix::zeros(3, 1);
        assert!(matches!(
            gauss_jordan(&mut a, &mut b),
            Err(LinalgError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn test_singular_dependent_rows() {
        let mut a = DenseMatrix::from_row_major(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert!(matches!(
            GaussJordan::default().invert(&mut a),
            Err(LinalgError::SingularMatrix { pivot: 1, .. })
        ));
    }

    #[test]
    fn test_badly_scaled_rows() {
        let mut a = DenseMatrix::from_diag(&[1e13, 1.0]);
        let mut b = DenseMatrix::from_row_major(2, 1, &[1e13, 1.0]);
        gauss_jordan(&mut a, &mut b).unwrap();
        assert_eq!(b.col(0), vec![1.0, 1.0]);
        assert_eq!(a.diag(), vec![1e-13, 1.0]);

        let mut a = DenseMatrix::from_row_major(2, 2, &[2e13, 1e13, 1.0, 3.0]);
        let mut b = DenseMatrix::from_row_major(2, 1, &[3e13, 4.0]);
        gauss_jordan(&mut a, &mut b).unwrap();
        assert_close(&b, &DenseMatrix::from_row_major(2, 1, &[1.0, 1.0]), 1e-12);
        // A^{-1} = [[3, -1e13], [-1, 2e13]] / 5e13
        let expected = DenseMatrix::from_row_major(2, 2, &[6e-14, -0.2, -2e-14, 0.4]);
        assert_close(&a, &expected, 1e-12);
    }

    #[test]
    fn test_badly_scaled_singular_still_fails() {
        let mut a = DenseMatrix::from_row_major(2, 2, &[1e13, 2e13, 1.0, 2.0]);
        assert!(matches!(
            GaussJordan::default().invert(&mut a),
            Err(LinalgError::SingularMatrix { pivot: 1, .. })
        ));
    }

    #[test]
    fn test_dimension_checks() {
        let mut a = DenseMatrix::zeros(2, 3);
        let mut b = DenseMatrix::zeros(2, 1);
        assert!(matches!(
            gauss_jordan(&mut a, &mut b),
            Err(LinalgError::NotSquare { nrows: 2, ncols: 3 })
        ));
        let mut a = DenseMatrix::identity(2);
        let mut b = DenseMatrix::zeros(3, 1);
        assert!(matches!(
            gauss_jordan(&mut a, &mut b),
            Err(LinalgError::DimensionMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn test_invert_matches_lu_inverse() {
        let a0 = DenseMatrix::from_row_major(3, 3, &[4.0, 3.0, 2.0, 2.0, 1.0, 3.0, 3.0, 2.0, 1.0]);
        let mut a = a0.clone();
        GaussJordan::new(1e-14).invert(&mut a).unwrap();
        let lu_inv = crate::decomposition::inverse(&a0).unwrap();
        assert_close(&a, &lu_inv, 1e-12);
    }
}

//! Matrix exponential by truncated Taylor series.
//!
//! e^A = sum_k A^k / k!, accumulated term by term until the Frobenius
//! norm of the latest term drops below the tolerance.

use tracing::{debug, warn};

use crate::dense::DenseMatrix;
use crate::error::{LinalgError, LinalgResult};

/// Taylor-series matrix exponential configuration.
#[derive(Debug, Clone)]
pub struct MatrixExp {
    /// Stop once `||A^k / k!||_F < tol`.
    pub tol: f64,
    /// Maximum number of series terms after the identity.
    pub max_terms: usize,
}

impl Default for MatrixExp {
    fn default() -> Self {
        Self {
            tol: 1e-12,
            max_terms: 1000,
        }
    }
}

impl MatrixExp {
    pub fn new(tol: f64, max_terms: usize) -> Self {
        Self { tol, max_terms }
    }

    /// Compute e^A for a square matrix.
    pub fn compute(&self, a: &DenseMatrix) -> LinalgResult<DenseMatrix> {
        let n = a.check_square()?;
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(LinalgError::InvalidTolerance(self.tol));
        }

        let mut result = DenseMatrix::identity(n);
        let mut term = DenseMatrix::identity(n);
        let mut next = DenseMatrix::zeros(n, n);
        let mut norm = term.frobenius_norm();

        for k in 1..=self.max_terms {
            term.mat_mul_into(a, &mut next)?;
            next.scale(1.0 / k as f64);
            std::mem::swap(&mut term, &mut next);
            result.add_assign(&term)?;

            if !term.as_slice().iter().all(|v| v.is_finite()) {
                warn!("Matrix exponential: term {} is not finite", k);
                return Err(LinalgError::NotConverged {
                    iterations: k,
                    norm: f64::INFINITY,
                });
            }
            norm = term.frobenius_norm();
            if norm < self.tol {
                debug!("Matrix exponential converged after {} terms (norm {:.2e})", k, norm);
                return Ok(result);
            }
        }

        warn!(
            "Matrix exponential did not converge in {} terms (norm {:.2e})",
            self.max_terms, norm
        );
        Err(LinalgError::NotConverged {
            iterations: self.max_terms,
            norm,
        })
    }
}

/// Compute e^A to tolerance `eps` with the default term cap.
pub fn expm(a: &DenseMatrix, eps: f64) -> LinalgResult<DenseMatrix> {
    MatrixExp {
        tol: eps,
        ..MatrixExp::default()
    }
    .compute(a)
}

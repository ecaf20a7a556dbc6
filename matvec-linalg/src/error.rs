//! Error type shared by every matvec-linalg routine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LinalgError {
    #[error("Singular matrix: pivot {pivot} has unusable magnitude {value:.3e}")]
    SingularMatrix { pivot: usize, value: f64 },

    #[error("Series did not converge after {iterations} terms (term norm: {norm:.2e})")]
    NotConverged { iterations: usize, norm: f64 },

    #[error("Matrix must be square, got {nrows}x{ncols}")]
    NotSquare { nrows: usize, ncols: usize },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Row {row} has {nonzeros} non-zeros, sparse form holds at most {max}")]
    InfeasibleSparsity {
        row: usize,
        nonzeros: usize,
        max: usize,
    },

    #[error("Row {row} is not a valid sparse row: {reason}")]
    MalformedSparse { row: usize, reason: String },

    #[error("Tolerance must be finite and positive, got {0}")]
    InvalidTolerance(f64),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for `Result<T, LinalgError>`.
pub type LinalgResult<T> = Result<T, LinalgError>;

//! matvec-linalg: small dense linear algebra kernels.
//!
//! Provides vector and dense matrix arithmetic, LU factorization with
//! triangular solves, Gauss-Jordan elimination with multiple right-hand
//! sides, the Taylor-series matrix exponential, and an in-place sparse
//! row encoding that reuses dense storage.

pub mod decomposition;
pub mod dense;
pub mod error;
pub mod expm;
pub mod gauss_jordan;
pub mod io;
pub mod sparse;
pub mod vector;

pub use decomposition::LuDecomp;
pub use dense::DenseMatrix;
pub use error::{LinalgError, LinalgResult};
pub use expm::MatrixExp;
pub use gauss_jordan::GaussJordan;

#![allow(clippy::needless_range_loop)]
//! Dense row-major matrix storage.
//!
//! `DenseMatrix` owns a flat row-major `Vec<f64>` plus its dimensions.
//! The flat buffer is exposed directly because the sparse row encoding
//! overlays its metadata onto the same storage.

use faer::Mat;
use serde::{Deserialize, Serialize};

use crate::error::{LinalgError, LinalgResult};

/// A dense `nrows x ncols` matrix stored row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct DenseMatrix {
    nrows: usize,
    ncols: usize,
    data: Vec<f64>,
}

/// Unchecked serde shape; converted through `TryFrom` so that a buffer
/// whose length disagrees with its dimensions is rejected on load.
#[derive(Deserialize)]
struct RawMatrix {
    nrows: usize,
    ncols: usize,
    data: Vec<f64>,
}

impl TryFrom<RawMatrix> for DenseMatrix {
    type Error = LinalgError;

    fn try_from(raw: RawMatrix) -> LinalgResult<Self> {
        DenseMatrix::try_from_vec(raw.nrows, raw.ncols, raw.data)
    }
}

impl DenseMatrix {
    /// Create a new dense matrix filled with zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            data: vec![0.0; nrows * ncols],
        }
    }

    /// Create an identity matrix of size n x n.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Create a dense matrix from a row-major slice.
    ///
    /// Panics if `data.len() != nrows * ncols`.
    pub fn from_row_major(nrows: usize, ncols: usize, data: &[f64]) -> Self {
        assert_eq!(data.len(), nrows * ncols);
        Self {
            nrows,
            ncols,
            data: data.to_vec(),
        }
    }

    /// Take ownership of a row-major buffer, checking its length.
    pub fn try_from_vec(nrows: usize, ncols: usize, data: Vec<f64>) -> LinalgResult<Self> {
        if data.len() != nrows * ncols {
            return Err(LinalgError::DimensionMismatch {
                expected: nrows * ncols,
                got: data.len(),
            });
        }
        Ok(Self { nrows, ncols, data })
    }

    /// Build from a list of equal-length rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> LinalgResult<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(nrows * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(LinalgError::DimensionMismatch {
                    expected: ncols,
                    got: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self { nrows, ncols, data })
    }

    /// Create a diagonal matrix from a vector.
    pub fn from_diag(diag: &[f64]) -> Self {
        let n = diag.len();
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = diag[i];
        }
        m
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Get element at (row, col).
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.ncols + col]
    }

    /// Set element at (row, col).
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.ncols + col] = value;
    }

    /// Borrow row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        &mut self.data[i * self.ncols..(i + 1) * self.ncols]
    }

    /// Extract column as a Vec<f64>.
    pub fn col(&self, j: usize) -> Vec<f64> {
        (0..self.nrows).map(|i| self.get(i, j)).collect()
    }

    /// Set an entire column from a slice.
    pub fn set_col(&mut self, j: usize, data: &[f64]) {
        assert_eq!(data.len(), self.nrows);
        for i in 0..self.nrows {
            self.set(i, j, data[i]);
        }
    }

    /// Swap two rows in place.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let m = self.ncols;
        let (head, tail) = self.data.split_at_mut(hi * m);
        head[lo * m..(lo + 1) * m].swap_with_slice(&mut tail[..m]);
    }

    /// Swap two columns in place.
    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for i in 0..self.nrows {
            self.data.swap(i * self.ncols + a, i * self.ncols + b);
        }
    }

    /// The raw row-major buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Overwrite `self` with the contents of `src`. Shapes must match.
    pub fn copy_from(&mut self, src: &DenseMatrix) -> LinalgResult<()> {
        self.check_same_shape(src)?;
        self.data.copy_from_slice(&src.data);
        Ok(())
    }

    /// Matrix-vector product: self * v -> result vector.
    pub fn mat_vec(&self, v: &[f64]) -> LinalgResult<Vec<f64>> {
        if v.len() != self.ncols {
            return Err(LinalgError::DimensionMismatch {
                expected: self.ncols,
                got: v.len(),
            });
        }
        Ok((0..self.nrows)
            .map(|i| crate::vector::dot(self.row(i), v))
            .collect())
    }

    /// Matrix-matrix product: self * other.
    pub fn mat_mul(&self, other: &DenseMatrix) -> LinalgResult<DenseMatrix> {
        let mut out = DenseMatrix::zeros(self.nrows, other.ncols);
        self.mat_mul_into(other, &mut out)?;
        Ok(out)
    }

    /// Matrix-matrix product written into a caller-owned buffer.
    pub fn mat_mul_into(&self, other: &DenseMatrix, out: &mut DenseMatrix) -> LinalgResult<()> {
        if self.ncols != other.nrows {
            return Err(LinalgError::DimensionMismatch {
                expected: self.ncols,
                got: other.nrows,
            });
        }
        if out.nrows != self.nrows {
            return Err(LinalgError::DimensionMismatch {
                expected: self.nrows,
                got: out.nrows,
            });
        }
        if out.ncols != other.ncols {
            return Err(LinalgError::DimensionMismatch {
                expected: other.ncols,
                got: out.ncols,
            });
        }
        let p = other.ncols;
        out.data.fill(0.0);
        for i in 0..self.nrows {
            for k in 0..self.ncols {
                let aik = self.get(i, k);
                if aik == 0.0 {
                    continue;
                }
                let brow = other.row(k);
                let orow = &mut out.data[i * p..(i + 1) * p];
                for j in 0..p {
                    orow[j] += aik * brow[j];
                }
            }
        }
        Ok(())
    }

    /// Transpose.
    pub fn transpose(&self) -> DenseMatrix {
        let mut t = DenseMatrix::zeros(self.ncols, self.nrows);
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                t.set(j, i, self.get(i, j));
            }
        }
        t
    }

    /// Element-wise `self += other`.
    pub fn add_assign(&mut self, other: &DenseMatrix) -> LinalgResult<()> {
        self.check_same_shape(other)?;
        crate::vector::add_assign(&mut self.data, &other.data);
        Ok(())
    }

    /// Scalar multiplication in place.
    pub fn scale(&mut self, s: f64) {
        crate::vector::scale_in_place(&mut self.data, s);
    }

    /// Diagonal of a (possibly rectangular) matrix.
    pub fn diag(&self) -> Vec<f64> {
        let n = self.nrows.min(self.ncols);
        (0..n).map(|i| self.get(i, i)).collect()
    }

    /// Frobenius norm, the Euclidean norm of the flattened buffer.
    pub fn frobenius_norm(&self) -> f64 {
        crate::vector::norm_eucl(&self.data)
    }

    /// Largest absolute entry (0.0 for an empty matrix).
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Copy into a column-major faer matrix.
    pub fn to_faer(&self) -> Mat<f64> {
        Mat::from_fn(self.nrows, self.ncols, |i, j| self.get(i, j))
    }

    /// Copy out of a faer matrix.
    pub fn from_faer(mat: &Mat<f64>) -> Self {
        let mut m = DenseMatrix::zeros(mat.nrows(), mat.ncols());
        for i in 0..mat.nrows() {
            for j in 0..mat.ncols() {
                m.set(i, j, mat.read(i, j));
            }
        }
        m
    }

    pub(crate) fn check_square(&self) -> LinalgResult<usize> {
        if !self.is_square() {
            return Err(LinalgError::NotSquare {
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }
        Ok(self.nrows)
    }

    fn check_same_shape(&self, other: &DenseMatrix) -> LinalgResult<()> {
        if self.nrows != other.nrows {
            return Err(LinalgError::DimensionMismatch {
                expected: self.nrows,
                got: other.nrows,
            });
        }
        if self.ncols != other.ncols {
            return Err(LinalgError::DimensionMismatch {
                expected: self.ncols,
                got: other.ncols,
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                if j > 0 {
                    write!(f, "\t")?;
                }
                write!(f, "{:.6}", self.get(i, j))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let m = DenseMatrix::zeros(3, 4);
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 4);
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.as_slice().len(), 12);
    }

    #[test]
    fn test_identity() {
        let m = DenseMatrix::identity(3);
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(0, 1), 0.0);
        assert_eq!(m.get(1, 1), 1.0);
        assert_eq!(m.get(2, 2), 1.0);
    }

    #[test]
    fn test_row_major_layout() {
        let m = DenseMatrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.get(1, 0), 4.0);
        assert_eq!(m.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(m.col(2), vec![3.0, 6.0]);
    }

    #[test]
    fn test_try_from_vec_rejects_bad_length() {
        assert!(DenseMatrix::try_from_vec(2, 2, vec![1.0; 3]).is_err());
        assert!(DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
    }

    #[test]
    fn test_mat_vec() {
        let m = DenseMatrix::identity(3);
        let v = vec![1.0, 2.0, 3.0];
        let result = m.mat_vec(&v).unwrap();
        assert_eq!(result, vec![1.0, 2.0, 3.0]);
        assert!(m.mat_vec(&[1.0]).is_err());
    }

    #[test]
    fn test_mat_mul() {
        let a = DenseMatrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = DenseMatrix::from_row_major(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = a.mat_mul(&b).unwrap();
        assert_eq!(c.nrows(), 2);
        assert_eq!(c.ncols(), 2);
        assert!((c.get(0, 0) - 58.0).abs() < 1e-10);
        assert!((c.get(0, 1) - 64.0).abs() < 1e-10);
        assert!((c.get(1, 0) - 139.0).abs() < 1e-10);
        assert!((c.get(1, 1) - 154.0).abs() < 1e-10);
    }

    #[test]
    fn test_mat_mul_dimension_mismatch() {
        let a = DenseMatrix::zeros(2, 3);
        let b = DenseMatrix::zeros(2, 3);
        assert!(matches!(
            a.mat_mul(&b),
            Err(LinalgError::DimensionMismatch { expected: 3, got: 2 })
        ));
        let mut out = DenseMatrix::zeros(3, 3);
        assert!(a.mat_mul_into(&b.transpose(), &mut out).is_err());
    }

    #[test]
    fn test_transpose() {
        let a = DenseMatrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let at = a.transpose();
        assert_eq!(at.nrows(), 3);
        assert_eq!(at.ncols(), 2);
        assert_eq!(at.get(0, 0), 1.0);
        assert_eq!(at.get(1, 0), 2.0);
        assert_eq!(at.get(0, 1), 4.0);
    }

    #[test]
    fn test_swap_rows_and_cols() {
        let mut m = DenseMatrix::from_row_major(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        m.swap_rows(1, 0);
        assert_eq!(m.as_slice(), &[3.0, 4.0, 1.0, 2.0]);
        m.swap_cols(0, 1);
        assert_eq!(m.as_slice(), &[4.0, 3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_norms() {
        let m = DenseMatrix::from_row_major(2, 2, &[3.0, 0.0, 0.0, -4.0]);
        assert!((m.frobenius_norm() - 5.0).abs() < 1e-12);
        assert_eq!(m.max_abs(), 4.0);
    }

    #[test]
    fn test_from_diag() {
        let d = DenseMatrix::from_diag(&[2.0, 3.0, 5.0]);
        assert_eq!(d.get(0, 0), 2.0);
        assert_eq!(d.get(1, 1), 3.0);
        assert_eq!(d.get(2, 2), 5.0);
        assert_eq!(d.get(0, 1), 0.0);
        assert_eq!(d.diag(), vec![2.0, 3.0, 5.0]);
    }

    #[test]
    fn test_faer_roundtrip() {
        let a = DenseMatrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let f = a.to_faer();
        assert_eq!(f.nrows(), 2);
        assert_eq!(f.read(1, 2), 6.0);
        assert_eq!(DenseMatrix::from_faer(&f), a);
    }

    #[test]
    fn test_serde_rejects_inconsistent_shape() {
        let ok: DenseMatrix =
            serde_json::from_str(r#"{"nrows":1,"ncols":2,"data":[1.0,2.0]}"#).unwrap();
        assert_eq!(ok.get(0, 1), 2.0);
        let bad = serde_json::from_str::<DenseMatrix>(r#"{"nrows":2,"ncols":2,"data":[1.0]}"#);
        assert!(bad.is_err());
    }
}

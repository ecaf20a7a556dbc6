#![allow(clippy::needless_range_loop)]
//! In-place sparse row encoding.
//!
//! A packed matrix occupies exactly the storage of the dense `n x m`
//! matrix it represents. Each physical row is laid out as
//!
//! ```text
//! [ N | idx_1 .. idx_N | val_1 .. val_N | (unused) .. | SENTINEL ]
//! ```
//!
//! where `N` and the column indices are integral values stored as `f64`
//! and the last cell holds the bit pattern [`SPARSE_SENTINEL_BITS`].
//! A row of 10 columns with `1.3`, `4.7`, `-3.4` at columns 3, 6 and 9
//! is stored as `3 3 6 9 1.3 4.7 -3.4 0 0 SENTINEL`.
//!
//! Because the count and sentinel cells plus one index/value pair per
//! non-zero all share the row, a matrix with `m` columns can only be packed
//! when every row has at most `(m - 2) / 2` non-zeros.

use sprs::{CsMat, TriMat};
use tracing::debug;

use crate::dense::DenseMatrix;
use crate::error::{LinalgError, LinalgResult};

/// Bit pattern marking the last cell of a packed row.
pub const SPARSE_SENTINEL_BITS: u64 = 0xDEAD_BEEF_BABE_FACE;

/// The sentinel reinterpreted as an `f64`.
#[inline]
pub fn sentinel() -> f64 {
    f64::from_bits(SPARSE_SENTINEL_BITS)
}

#[inline]
fn is_sentinel(v: f64) -> bool {
    v.to_bits() == SPARSE_SENTINEL_BITS
}

/// Maximum number of non-zeros a packed row of `ncols` cells can hold.
pub fn max_nonzeros(ncols: usize) -> usize {
    ncols.saturating_sub(2) / 2
}

fn count_nonzeros(row: &[f64]) -> usize {
    row.iter().filter(|&&v| v != 0.0).count()
}

fn check_packable_width(ncols: usize) -> LinalgResult<()> {
    if ncols < 2 {
        return Err(LinalgError::MalformedSparse {
            row: 0,
            reason: format!("packed rows need at least 2 columns, got {ncols}"),
        });
    }
    Ok(())
}

/// Pack a dense matrix into the sparse row encoding, in place.
///
/// Every row is checked before anything is written: if any row holds more
/// than [`max_nonzeros`] non-zeros the matrix is returned untouched with
/// [`LinalgError::InfeasibleSparsity`]. Negative zero is treated as zero.
pub fn make_sparse(a: &mut DenseMatrix) -> LinalgResult<()> {
    let m = a.ncols();
    check_packable_width(m)?;
    let max = max_nonzeros(m);

    for i in 0..a.nrows() {
        let nonzeros = count_nonzeros(a.row(i));
        if nonzeros > max {
            debug!("Row {} has {} non-zeros (max {}), not packing", i, nonzeros, max);
            return Err(LinalgError::InfeasibleSparsity {
                row: i,
                nonzeros,
                max,
            });
        }
    }

    // The packed row overwrites cells that are still unread in the dense
    // row, so each row is assembled in scratch before being written back.
    let mut scratch = vec![0.0; m];
    for i in 0..a.nrows() {
        scratch.fill(0.0);
        let row = a.row(i);
        let nnz = count_nonzeros(row);
        scratch[0] = nnz as f64;
        let mut k = 0;
        for (j, &v) in row.iter().enumerate() {
            if v != 0.0 {
                scratch[1 + k] = j as f64;
                scratch[1 + nnz + k] = v;
                k += 1;
            }
        }
        scratch[m - 1] = sentinel();
        a.row_mut(i).copy_from_slice(&scratch);
    }
    Ok(())
}

/// Out-of-place form of [`make_sparse`].
pub fn to_sparse(a: &DenseMatrix) -> LinalgResult<DenseMatrix> {
    let mut packed = a.clone();
    make_sparse(&mut packed)?;
    Ok(packed)
}

/// Expand a packed matrix back to dense form, in place.
///
/// All rows are validated first; a malformed row yields
/// [`LinalgError::MalformedSparse`] and leaves the matrix untouched.
pub fn unsparse(a: &mut DenseMatrix) -> LinalgResult<()> {
    check_packable_width(a.ncols())?;
    for i in 0..a.nrows() {
        check_sparse_row(a.row(i))
            .map_err(|reason| LinalgError::MalformedSparse { row: i, reason })?;
    }

    let mut scratch = vec![0.0; a.ncols()];
    for i in 0..a.nrows() {
        scratch.fill(0.0);
        for (j, v) in SparseRow::new_unchecked(a.row(i)).iter() {
            scratch[j] = v;
        }
        a.row_mut(i).copy_from_slice(&scratch);
    }
    Ok(())
}

/// Out-of-place form of [`unsparse`].
pub fn to_dense(a: &DenseMatrix) -> LinalgResult<DenseMatrix> {
    let mut dense = a.clone();
    unsparse(&mut dense)?;
    Ok(dense)
}

/// True iff every row ends in the sentinel bit pattern.
pub fn is_sparse(a: &DenseMatrix) -> bool {
    a.ncols() >= 2 && (0..a.nrows()).all(|i| a.row(i).last().is_some_and(|&v| is_sentinel(v)))
}

/// Full structural validation of a packed matrix.
pub fn sparse_sanity(a: &DenseMatrix) -> bool {
    a.ncols() >= 2 && (0..a.nrows()).all(|i| check_sparse_row(a.row(i)).is_ok())
}

/// Validate one packed row, returning the first problem found.
///
/// Checks the sentinel, that the count is a non-negative integer within
/// [`max_nonzeros`], and that the indices are distinct integers naming
/// columns of the represented dense row.
pub fn check_sparse_row(row: &[f64]) -> Result<(), String> {
    let m = row.len();
    if m < 2 {
        return Err(format!("row has {m} cells, need at least 2"));
    }
    if !is_sentinel(row[m - 1]) {
        return Err("missing sentinel in last column".to_string());
    }

    let count = row[0];
    let max = max_nonzeros(m);
    if !count.is_finite() || count < 0.0 || count.fract() != 0.0 {
        return Err(format!("count {count} is not a non-negative integer"));
    }
    if count > max as f64 {
        return Err(format!("count {count} exceeds capacity {max}"));
    }

    let nnz = count as usize;
    let mut seen = vec![false; m];
    for k in 0..nnz {
        let idx = row[1 + k];
        if !idx.is_finite() || idx < 0.0 || idx.fract() != 0.0 {
            return Err(format!("index {idx} is not a non-negative integer"));
        }
        if idx >= m as f64 {
            return Err(format!("index {idx} out of range for {m} columns"));
        }
        let j = idx as usize;
        if seen[j] {
            return Err(format!("duplicate index {j}"));
        }
        seen[j] = true;
    }
    Ok(())
}

/// Read-only view of one packed row.
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a> {
    cells: &'a [f64],
    nnz: usize,
}

impl<'a> SparseRow<'a> {
    /// Validate `cells` and wrap them.
    pub fn new(cells: &'a [f64]) -> Result<Self, String> {
        check_sparse_row(cells)?;
        Ok(Self::new_unchecked(cells))
    }

    fn new_unchecked(cells: &'a [f64]) -> Self {
        Self {
            cells,
            nnz: cells[0] as usize,
        }
    }

    /// Number of stored non-zeros.
    pub fn nnz(&self) -> usize {
        self.nnz
    }

    /// `(column, value)` pairs in storage order.
    pub fn iter(&self) -> SparseRowIter<'a> {
        SparseRowIter {
            cells: self.cells,
            nnz: self.nnz,
            pos: 0,
        }
    }
}

impl<'a> IntoIterator for SparseRow<'a> {
    type Item = (usize, f64);
    type IntoIter = SparseRowIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the `(column, value)` pairs of a [`SparseRow`].
#[derive(Debug, Clone)]
pub struct SparseRowIter<'a> {
    cells: &'a [f64],
    nnz: usize,
    pos: usize,
}

impl Iterator for SparseRowIter<'_> {
    type Item = (usize, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.nnz {
            return None;
        }
        let k = self.pos;
        self.pos += 1;
        Some((self.cells[1 + k] as usize, self.cells[1 + self.nnz + k]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.nnz - self.pos;
        (left, Some(left))
    }
}

impl ExactSizeIterator for SparseRowIter<'_> {}

/// View row `i` of a packed matrix.
pub fn sparse_row(a: &DenseMatrix, i: usize) -> LinalgResult<SparseRow<'_>> {
    SparseRow::new(a.row(i)).map_err(|reason| LinalgError::MalformedSparse { row: i, reason })
}

/// `y = A * x` computed directly on a packed matrix.
///
/// `x` has one entry per column of the represented dense matrix.
pub fn sparse_mat_vec(a: &DenseMatrix, x: &[f64]) -> LinalgResult<Vec<f64>> {
    if x.len() != a.ncols() {
        return Err(LinalgError::DimensionMismatch {
            expected: a.ncols(),
            got: x.len(),
        });
    }
    let mut y = vec![0.0; a.nrows()];
    for i in 0..a.nrows() {
        y[i] = sparse_row(a, i)?.iter().map(|(j, v)| v * x[j]).sum();
    }
    Ok(y)
}

/// Export a packed matrix as a CSR matrix of the same logical shape.
pub fn to_csr(a: &DenseMatrix) -> LinalgResult<CsMat<f64>> {
    let mut tri = TriMat::new((a.nrows(), a.ncols()));
    for i in 0..a.nrows() {
        for (j, v) in sparse_row(a, i)?.iter() {
            tri.add_triplet(i, j, v);
        }
    }
    Ok(tri.to_csr())
}

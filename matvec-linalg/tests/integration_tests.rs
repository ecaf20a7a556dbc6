//! Integration tests exercising the public API end to end: packing,
//! file round-trips, and the solvers working on unpacked data.

use matvec_linalg::decomposition::{self, LuDecomp};
use matvec_linalg::gauss_jordan::gauss_jordan;
use matvec_linalg::io::{load_matrix, load_vector, save_matrix, save_vector};
use matvec_linalg::sparse::{self, is_sparse, make_sparse, sparse_sanity, unsparse};
use matvec_linalg::{DenseMatrix, LinalgError};

/// Four rows with exactly two non-zeros each, in 8 physical columns
/// (capacity (8 - 2) / 2 = 3 per row).
fn two_per_row() -> DenseMatrix {
    DenseMatrix::from_row_major(
        4,
        8,
        &[
            5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.5, //
            0.0, 4.0, 0.0, -1.0, 0.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 3.0, 0.0, //
            0.0, 0.25, 0.0, 0.0, 0.0, 6.0, 0.0, 0.0,
        ],
    )
}

#[test]
fn test_two_then_three_nonzeros_roundtrip() {
    let original = two_per_row();
    let mut a = original.clone();
    make_sparse(&mut a).unwrap();
    unsparse(&mut a).unwrap();
    assert_eq!(a, original);

    let mut wider = original.clone();
    wider.set(2, 0, -9.0);
    let mut a = wider.clone();
    make_sparse(&mut a).unwrap();
    assert_eq!(sparse::sparse_row(&a, 2).unwrap().nnz(), 3);
    unsparse(&mut a).unwrap();
    assert_eq!(a, wider);
}

#[test]
fn test_square_4x4_holds_only_one_nonzero_per_row() {
    let mut a = DenseMatrix::from_row_major(
        4,
        4,
        &[
            1.0, 0.0, 0.0, 0.0, //
            0.0, 2.0, 0.0, 0.0, //
            0.0, 0.0, 3.0, 0.0, //
            0.0, 0.0, 4.0, 5.0,
        ],
    );
    assert!(matches!(
        make_sparse(&mut a),
        Err(LinalgError::InfeasibleSparsity { row: 3, nonzeros: 2, max: 1 })
    ));
    a.set(3, 2, 0.0);
    make_sparse(&mut a).unwrap();
    assert!(is_sparse(&a));
}

#[test]
fn test_packed_matrix_survives_text_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("packed.mat");

    let packed = sparse::to_sparse(&two_per_row()).unwrap();
    save_matrix(&path, &packed).unwrap();
    let loaded = load_matrix(&path).unwrap();

    assert!(is_sparse(&loaded));
    assert!(sparse_sanity(&loaded));
    for (x, y) in loaded.as_slice().iter().zip(packed.as_slice()) {
        assert_eq!(x.to_bits(), y.to_bits());
    }
    assert_eq!(sparse::to_dense(&loaded).unwrap(), two_per_row());
}

#[test]
fn test_json_roundtrip() {
    let a = two_per_row();
    let json = serde_json::to_string(&a).unwrap();
    let back: DenseMatrix = serde_json::from_str(&json).unwrap();
    assert_eq!(back, a);
}

#[test]
fn test_solve_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let a_path = dir.path().join("a.mat");
    let b_path = dir.path().join("b.vec");

    let a = DenseMatrix::from_row_major(3, 3, &[10.0, 1.0, 2.0, 1.0, 8.0, 1.0, 2.0, 1.0, 9.0]);
    let b = vec![13.0, 10.0, 12.0];
    save_matrix(&a_path, &a).unwrap();
    save_vector(&b_path, &b).unwrap();

    let a = load_matrix(&a_path).unwrap();
    let b = load_vector(&b_path).unwrap();
    let x = decomposition::solve(&a, &b).unwrap();
    for xi in &x {
        assert!((xi - 1.0).abs() < 1e-12, "x = {:?}", x);
    }
}

#[test]
fn test_lu_and_gauss_jordan_agree_on_solution() {
    let a0 = DenseMatrix::from_row_major(3, 3, &[4.0, -2.0, 1.0, -2.0, 4.0, -2.0, 1.0, -2.0, 4.0]);
    let rhs = [11.0, -16.0, 17.0];

    let x_lu = LuDecomp::new(&a0).unwrap().solve(&rhs).unwrap();

    let mut a = a0.clone();
    let mut b = DenseMatrix::from_row_major(3, 1, &rhs);
    gauss_jordan(&mut a, &mut b).unwrap();

    for i in 0..3 {
        assert!((x_lu[i] - b.get(i, 0)).abs() < 1e-12);
    }
    // x = [1, -2, 3]
    assert!((x_lu[0] - 1.0).abs() < 1e-12);
    assert!((x_lu[1] + 2.0).abs() < 1e-12);
    assert!((x_lu[2] - 3.0).abs() < 1e-12);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_matrix(&dir.path().join("nope.mat"));
    assert!(matches!(result, Err(LinalgError::Io(_))));
}

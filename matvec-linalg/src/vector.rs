#![allow(clippy::needless_range_loop)]
//! Elementary vector arithmetic over `f64` slices.
//!
//! The slice length is the vector dimension. Operands must agree in
//! length; a mismatch is a programming error and panics.

/// Dot product of two vectors.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean (L2) norm.
///
/// Entries are scaled by the largest magnitude before squaring, so the
/// result is finite whenever the true norm is.
pub fn norm_eucl(v: &[f64]) -> f64 {
    let scale = v.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if scale == 0.0 || !scale.is_finite() {
        return dot(v, v).sqrt();
    }
    let sum: f64 = v.iter().map(|x| (x / scale) * (x / scale)).sum();
    scale * sum.sqrt()
}

/// Sum of absolute values (L1 norm).
pub fn norm1(v: &[f64]) -> f64 {
    v.iter().map(|x| x.abs()).sum()
}

/// sum = a + b
pub fn add_into(sum: &mut [f64], a: &[f64], b: &[f64]) {
    assert_eq!(sum.len(), a.len());
    assert_eq!(a.len(), b.len());
    for i in 0..sum.len() {
        sum[i] = a[i] + b[i];
    }
}

/// diff = a - b
pub fn diff_into(diff: &mut [f64], a: &[f64], b: &[f64]) {
    assert_eq!(diff.len(), a.len());
    assert_eq!(a.len(), b.len());
    for i in 0..diff.len() {
        diff[i] = a[i] - b[i];
    }
}

/// prod = k * v
pub fn scal_mul_into(prod: &mut [f64], k: f64, v: &[f64]) {
    assert_eq!(prod.len(), v.len());
    for i in 0..prod.len() {
        prod[i] = k * v[i];
    }
}

/// acc += v
pub fn add_assign(acc: &mut [f64], v: &[f64]) {
    assert_eq!(acc.len(), v.len());
    for i in 0..acc.len() {
        acc[i] += v[i];
    }
}

/// acc -= v
pub fn sub_assign(acc: &mut [f64], v: &[f64]) {
    assert_eq!(acc.len(), v.len());
    for i in 0..acc.len() {
        acc[i] -= v[i];
    }
}

/// v *= k
pub fn scale_in_place(v: &mut [f64], k: f64) {
    for x in v.iter_mut() {
        *x *= k;
    }
}

pub fn copy_into(dest: &mut [f64], src: &[f64]) {
    dest.copy_from_slice(src);
}

pub fn set_zero(v: &mut [f64]) {
    v.fill(0.0);
}

/// Write `src / |src|` into `dest`.
///
/// A zero vector has no direction; it is copied through unchanged rather
/// than producing NaNs.
pub fn normalize_into(dest: &mut [f64], src: &[f64]) {
    let len = norm_eucl(src);
    if len > 0.0 {
        scal_mul_into(dest, 1.0 / len, src);
    } else {
        copy_into(dest, src);
    }
}

pub fn normalize_in_place(v: &mut [f64]) {
    let len = norm_eucl(v);
    if len > 0.0 {
        scale_in_place(v, 1.0 / len);
    }
}

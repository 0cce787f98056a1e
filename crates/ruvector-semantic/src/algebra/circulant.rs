//! Circulant matrices for expressing binding as a linear map
//!
//! Binding with a fixed vector `v` is linear in the other operand, so it
//! can be written as `C(v) · x`. These matrices are what a neural wiring
//! layer needs to compile a bind/unbind into connection weights.

use nalgebra::DMatrix;

/// D×D matrix with `convolution_matrix(v) · x == circular_convolution(v, x)`
///
/// Entry `(i, j)` is `v[(i - j) mod D]`, so column `j` is `v` rotated by `j`.
/// The row-rotated matrix is the transpose, which equals
/// [`correlation_matrix`].
///
/// # Example
///
/// ```rust
/// use nalgebra::DVector;
/// use ruvector_semantic::algebra::{circular_convolution, convolution_matrix};
///
/// let v = vec![1.0, 2.0, 3.0];
/// let x = vec![0.5, -1.0, 2.0];
///
/// let via_matrix = convolution_matrix(&v) * DVector::from_column_slice(&x);
/// let via_fft = circular_convolution(&v, &x).unwrap();
/// for (a, b) in via_matrix.iter().zip(&via_fft) {
///     assert!((a - b).abs() < 1e-9);
/// }
/// ```
pub fn convolution_matrix(v: &[f64]) -> DMatrix<f64> {
    let n = v.len();
    DMatrix::from_fn(n, n, |i, j| v[(i + n - j) % n])
}

/// D×D matrix with `correlation_matrix(v) · x == circular_correlation(x, v)`
///
/// Built as the convolution matrix of `v` with its indices reversed
/// (index 0 stays in place), since correlating with `v` is convolving with
/// its involution.
pub fn correlation_matrix(v: &[f64]) -> DMatrix<f64> {
    convolution_matrix(&involution(v))
}

/// `[v0, v_{D-1}, ..., v1]`
fn involution(v: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(v.len());
    if let Some((&first, rest)) = v.split_first() {
        out.push(first);
        out.extend(rest.iter().rev());
    }
    out
}

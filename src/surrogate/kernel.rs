//! Matérn 5/2 covariance and the matrices built from it.

use nalgebra::{DMatrix, DVector};

/// Precomputed √5 constant.
const SQRT_5: f64 = 2.236_067_977_499_79;

/// Isotropic Matérn 5/2 kernel with unit signal variance.
///
/// `k(x1, x2) = (1 + √5 r + 5/3 r²) exp(-√5 r)`
/// where `r = ‖x1 - x2‖ / l`
pub(crate) fn matern52(x1: &[f64], x2: &[f64], length_scale: f64) -> f64 {
    let r_sq = x1
        .iter()
        .zip(x2)
        .map(|(a, b)| {
            let diff = (a - b) / length_scale;
            diff * diff
        })
        .sum::<f64>();
    let sqrt5_r = SQRT_5 * r_sq.sqrt();
    (1.0 + sqrt5_r + 5.0 / 3.0 * r_sq) * (-sqrt5_r).exp()
}

/// Build the kernel matrix `K + σ²I`.
pub(crate) fn kernel_matrix(x: &[Vec<f64>], length_scale: f64, noise_var: f64) -> DMatrix<f64> {
    let n = x.len();
    DMatrix::from_fn(n, n, |i, j| {
        let k = matern52(&x[i], &x[j], length_scale);
        if i == j { k + noise_var } else { k }
    })
}

/// Compute the kernel vector k(x*, X) for a test point.
pub(crate) fn kernel_vector(x_star: &[f64], x_train: &[Vec<f64>], length_scale: f64) -> DVector<f64> {
    DVector::from_fn(x_train.len(), |i, _| matern52(x_star, &x_train[i], length_scale))
}

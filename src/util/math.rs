//! Mathematical helpers shared by the extractor stages.

use std::f32::consts::TAU;

/// Wraps an angle in radians to the range [0, 2π).
pub(crate) fn wrap_tau(angle: f32) -> f32 {
    let wrapped = angle % TAU;
    if wrapped < 0.0 {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Unnormalized isotropic Gaussian weight for a squared radius.
pub(crate) fn gaussian_weight(dist_sq: f32, sigma: f32) -> f32 {
    (-dist_sq / (2.0 * sigma * sigma)).exp()
}

/// Scales `values` to unit L2 norm in place and returns the original norm.
///
/// Vectors with zero norm are left untouched.
pub(crate) fn normalize_l2(values: &mut [f32]) -> f32 {
    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        let inv = 1.0 / norm;
        for value in values.iter_mut() {
            *value *= inv;
        }
    }
    norm
}

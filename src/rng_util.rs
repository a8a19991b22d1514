/// Generate a random `f64` in the range `[low, high)`.
#[inline]
pub(crate) fn f64_range(rng: &mut fastrand::Rng, low: f64, high: f64) -> f64 {
    low + rng.f64() * (high - low)
}

/// Draw one point uniformly from the box, independently per dimension.
pub(crate) fn uniform_point(rng: &mut fastrand::Rng, bounds: &[(f64, f64)]) -> Vec<f64> {
    bounds
        .iter()
        .map(|&(lo, hi)| f64_range(rng, lo, hi))
        .collect()
}

/// Project a point onto the box in place.
pub(crate) fn clip_in_place(point: &mut [f64], bounds: &[(f64, f64)]) {
    for (x, &(lo, hi)) in point.iter_mut().zip(bounds) {
        *x = x.clamp(lo, hi);
    }
}

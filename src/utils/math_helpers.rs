/// Squared euclidean distance between two points.
#[inline]
pub fn distance_squared<const D: usize>(a: &[f64; D], b: &[f64; D]) -> f64 {
    let mut sum = 0.0;
    for d in 0..D {
        let delta = a[d] - b[d];
        sum += delta * delta;
    }
    sum
}

/// Per-dimension midpoint of two points.
#[inline]
pub fn midpoint<const D: usize>(a: &[f64; D], b: &[f64; D]) -> [f64; D] {
    let mut mid = [0.0; D];
    for d in 0..D {
        // Halving each term first keeps huge coordinates from overflowing.
        mid[d] = a[d] * 0.5 + b[d] * 0.5;
    }
    mid
}

/// True if every coordinate is finite.
#[inline]
pub fn is_finite_point<const D: usize>(point: &[f64; D]) -> bool {
    point.iter().all(|c| c.is_finite())
}

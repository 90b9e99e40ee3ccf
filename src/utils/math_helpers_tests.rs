use crate::utils::{distance_squared, is_finite_point, midpoint};

#[test]
fn test_distance_squared() {
    assert_eq!(distance_squared(&[0.0, 0.0], &[3.0, 4.0]), 25.0);
    assert_eq!(distance_squared(&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]), 0.0);
}

#[test]
fn test_midpoint() {
    assert_eq!(midpoint(&[0.0, -2.0], &[10.0, 2.0]), [5.0, 0.0]);
    // Must not overflow for coordinates near f64::MAX.
    let mid = midpoint(&[f64::MAX], &[f64::MAX]);
    assert!(mid[0].is_finite());
}

#[test]
fn test_is_finite_point() {
    assert!(is_finite_point(&[1.0, 2.0]));
    assert!(!is_finite_point(&[1.0, f64::NAN]));
    assert!(!is_finite_point(&[f64::NEG_INFINITY]));
}

use approx::assert_relative_eq;
use crate::aggregation::IncrementalBarycenter;

#[test]
fn test_empty_reports_origin() {
    let barycenter = IncrementalBarycenter::new([5.0, 5.0]);
    assert!(barycenter.is_empty());
    assert_eq!(barycenter.position(), &[5.0, 5.0]);
    assert_eq!(barycenter.total_weight(), 0.0);
}

#[test]
fn test_equal_masses_meet_at_midpoint() {
    let mut barycenter = IncrementalBarycenter::new([0.0, 0.0, 0.0]);
    barycenter.update(&[1.0, 2.0, 3.0], 4.0);
    barycenter.update(&[3.0, -2.0, 7.0], 4.0);
    assert_relative_eq!(barycenter.position()[0], 2.0);
    assert_relative_eq!(barycenter.position()[1], 0.0);
    assert_relative_eq!(barycenter.position()[2], 5.0);
    assert_relative_eq!(barycenter.total_weight(), 8.0);
}

#[test]
fn test_weighted_mean() {
    let mut barycenter = IncrementalBarycenter::new([0.0]);
    barycenter.update(&[0.0], 3.0);
    barycenter.update(&[4.0], 1.0);
    // (0 * 3 + 4 * 1) / 4
    assert_relative_eq!(barycenter.position()[0], 1.0);
}

#[test]
fn test_zero_weight_update_is_ignored() {
    let mut barycenter = IncrementalBarycenter::new([1.0, 1.0]);
    barycenter.update(&[100.0, 100.0], 0.0);
    assert!(barycenter.is_empty());
    assert_eq!(barycenter.position(), &[1.0, 1.0]);
}

#[test]
fn test_negative_weight_removes_contribution() {
    let mut barycenter = IncrementalBarycenter::new([0.0, 0.0]);
    barycenter.update(&[2.0, 0.0], 1.0);
    barycenter.update(&[6.0, 4.0], 1.0);
    barycenter.update(&[6.0, 4.0], -1.0);
    assert_relative_eq!(barycenter.position()[0], 2.0);
    assert_relative_eq!(barycenter.position()[1], 0.0);
    assert_relative_eq!(barycenter.total_weight(), 1.0);
}

#[test]
fn test_removing_everything_falls_back_to_origin() {
    let mut barycenter = IncrementalBarycenter::new([9.0, 9.0]);
    barycenter.update(&[2.0, 3.0], 2.5);
    barycenter.update(&[2.0, 3.0], -2.5);
    assert!(barycenter.is_empty());
    assert_eq!(barycenter.position(), &[9.0, 9.0]);
    assert!(barycenter.position().iter().all(|c| c.is_finite()));
}

#[test]
fn test_merge_matches_direct_updates() {
    let points = [([1.0, 1.0], 1.0), ([2.0, 5.0], 2.0), ([-3.0, 0.5], 0.5), ([4.0, 4.0], 3.0)];

    let mut direct = IncrementalBarycenter::new([0.0, 0.0]);
    for (p, w) in &points {
        direct.update(p, *w);
    }

    let mut left = IncrementalBarycenter::new([0.0, 0.0]);
    let mut right = IncrementalBarycenter::new([0.0, 0.0]);
    for (p, w) in &points[..2] {
        left.update(p, *w);
    }
    for (p, w) in &points[2..] {
        right.update(p, *w);
    }
    let mut merged = IncrementalBarycenter::new([0.0, 0.0]);
    merged.merge(&left);
    merged.merge(&right);

    assert_relative_eq!(merged, direct, epsilon = 1e-12);
}

#[test]
fn test_merge_empty_is_noop() {
    let mut barycenter = IncrementalBarycenter::new([0.0]);
    barycenter.update(&[3.0], 1.0);
    let empty = IncrementalBarycenter::new([50.0]);
    barycenter.merge(&empty);
    assert_eq!(barycenter.position(), &[3.0]);
    assert_eq!(barycenter.total_weight(), 1.0);
}

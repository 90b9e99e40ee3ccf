use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::BoundingRegion;
use crate::parallel::{par_far_field, par_map_elements, par_map_leaves, par_neighbors};
use crate::queries::{FarFieldQuery, NeighborQuery};
use crate::tree::Tree;
use crate::utils::TreeConfig;

fn random_points(count: usize, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| [
            rng.random_range(-50.0..50.0),
            rng.random_range(-50.0..50.0),
            rng.random_range(-50.0..50.0),
        ])
        .collect()
}

fn build(points: &[[f64; 3]]) -> Tree<'_, [f64; 3], 3> {
    let region = BoundingRegion::new([-50.0; 3], [50.0; 3]).unwrap();
    Tree::build(points, region, TreeConfig::default().with_capacity(6)).unwrap()
}

#[test]
fn test_par_map_elements_keeps_element_order() {
    let points = random_points(1000, 1);
    let tree = build(&points);

    let leaves = par_map_elements(&tree, |id| tree.leaf_of(id));
    assert_eq!(leaves.len(), points.len());
    for (id, leaf) in leaves.into_iter().enumerate() {
        assert_eq!(leaf, Some(tree.find_leaf(&points[id])));
    }
}

#[test]
fn test_par_map_leaves_matches_sequential_walk() {
    let points = random_points(800, 2);
    let tree = build(&points);

    let parallel = par_map_leaves(&tree, |leaf| (leaf.id(), leaf.len()));
    let sequential: Vec<_> = tree.leaves().map(|leaf| (leaf.id(), leaf.len())).collect();
    assert_eq!(parallel, sequential);
}

#[test]
fn test_par_neighbors_matches_sequential() {
    let points = random_points(500, 3);
    let tree = build(&points);

    let parallel = par_neighbors(&tree, Some(10.0));
    for (id, neighbors) in parallel.iter().enumerate() {
        let sequential: Vec<usize> = NeighborQuery::of_element(&tree, id).unwrap()
            .within(10.0)
            .into_iter()
            .collect();
        assert_eq!(neighbors, &sequential);
    }
}

#[test]
fn test_par_far_field_matches_sequential() {
    let points = random_points(600, 4);
    let tree = build(&points);
    let query = FarFieldQuery::new(&tree).with_theta(0.8).unwrap();

    let parallel = par_far_field(&query);
    assert_eq!(parallel.len(), points.len());
    for (id, field) in parallel.iter().enumerate() {
        assert_eq!(field, &query.for_element(id).unwrap());
        assert_eq!(field.covered(&tree), points.len() - 1);
    }
}

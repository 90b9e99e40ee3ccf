use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::BoundingRegion;
use crate::queries::NeighborQuery;
use crate::tree::{NodeId, Tree};
use crate::utils::{distance_squared, TreeConfig, TreeError};

fn random_cube(count: usize, seed: u64) -> Vec<[f64; 3]> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| [
            rng.random_range(0.0..100.0),
            rng.random_range(0.0..100.0),
            rng.random_range(0.0..100.0),
        ])
        .collect()
}

fn cube() -> BoundingRegion<3> {
    BoundingRegion::new([0.0; 3], [100.0; 3]).unwrap()
}

#[test]
fn test_leaf_neighbors_include_every_same_leaf_point() {
    let points = random_cube(100, 42);
    let tree = Tree::build(&points, cube(), TreeConfig::default().with_capacity(8)).unwrap();

    for leaf in tree.leaves().filter(|leaf| !leaf.is_empty()) {
        let neighbors: HashSet<usize> = leaf.neighbors().into_iter().collect();
        for (id, point) in points.iter().enumerate() {
            if leaf.region().contains(point) {
                assert!(neighbors.contains(&id), "leaf {:?} lost element {}", leaf.id(), id);
            }
        }
    }
}

#[test]
fn test_own_leaf_comes_first() {
    let points = random_cube(100, 42);
    let tree = Tree::build(&points, cube(), TreeConfig::default().with_capacity(8)).unwrap();

    let leaf = tree.leaves().find(|leaf| leaf.len() >= 2).unwrap();
    let own: HashSet<usize> = leaf.elements().collect();
    let first: HashSet<usize> = leaf.neighbors().into_iter().take(own.len()).collect();
    assert_eq!(first, own);
}

#[test]
fn test_unbounded_query_visits_every_element_once() {
    let points = random_cube(300, 1);
    let tree = Tree::build(&points, cube(), TreeConfig::default().with_capacity(4)).unwrap();

    let found: Vec<usize> = NeighborQuery::of_element(&tree, 17).unwrap().into_iter().collect();
    let unique: HashSet<usize> = found.iter().copied().collect();

    assert_eq!(found.len(), points.len() - 1);
    assert_eq!(unique.len(), found.len());
    assert!(!unique.contains(&17));
}

#[test]
fn test_rings_widen_monotonically() {
    // Each ring comes from a higher ancestor, so the depth of the lowest
    // common ancestor with the start leaf never increases along the sequence.
    let points = random_cube(200, 8);
    let tree = Tree::build(&points, cube(), TreeConfig::default().with_capacity(2)).unwrap();
    let start = tree.leaf_of(0).unwrap();

    let ancestors = |node: NodeId| {
        let mut chain = vec![node];
        let mut current = node;
        while let Some(parent) = tree.node(current).parent() {
            chain.push(parent);
            current = parent;
        }
        chain
    };
    let start_chain = ancestors(start);

    let mut previous = usize::MAX;
    for id in NeighborQuery::of_element(&tree, 0).unwrap() {
        let leaf = tree.leaf_of(id).unwrap();
        let common = ancestors(leaf)
            .into_iter()
            .find(|node| start_chain.contains(node))
            .unwrap();
        let depth = tree.node(common).depth();
        assert!(depth <= previous);
        previous = depth;
    }
}

#[test]
fn test_radius_never_prunes_points_inside_it() {
    let points = random_cube(400, 77);
    let tree = Tree::build(&points, cube(), TreeConfig::default().with_capacity(4)).unwrap();
    let radius = 15.0;

    for source in [0, 50, 123, 399] {
        let found: HashSet<usize> = NeighborQuery::of_element(&tree, source).unwrap()
            .within(radius)
            .into_iter()
            .collect();
        let unbounded = NeighborQuery::of_element(&tree, source).unwrap().into_iter().count();

        for (id, point) in points.iter().enumerate() {
            if id != source && distance_squared(point, &points[source]) <= radius * radius {
                assert!(found.contains(&id));
            }
        }
        assert!(found.len() < unbounded);
    }
}

#[test]
fn test_limit_stops_early() {
    let points = random_cube(100, 3);
    let tree = Tree::build(&points, cube(), TreeConfig::default()).unwrap();

    let found: Vec<usize> = NeighborQuery::of_element(&tree, 5).unwrap().with_limit(7).into_iter().collect();
    assert_eq!(found.len(), 7);

    let none: Vec<usize> = NeighborQuery::of_element(&tree, 5).unwrap().with_limit(0).into_iter().collect();
    assert!(none.is_empty());
}

#[test]
fn test_configured_limit_is_default() {
    let points = random_cube(100, 3);
    let config = TreeConfig::default().with_neighbor_limit(Some(10));
    let tree = Tree::build(&points, cube(), config).unwrap();

    assert_eq!(NeighborQuery::of_element(&tree, 0).unwrap().into_iter().count(), 10);
    assert_eq!(NeighborQuery::of_element(&tree, 0).unwrap().without_limit().into_iter().count(), 99);
}

#[test]
fn test_around_point_outside_root_falls_back() {
    let points = random_cube(100, 12);
    let tree = Tree::build(&points, cube(), TreeConfig::default()).unwrap();

    let query = NeighborQuery::around(&tree, [250.0, -10.0, 50.0]);
    assert_eq!(query.start(), tree.find_leaf(&[0.0, 0.0, 0.0]));
    assert_eq!(query.into_iter().count(), points.len());
}

#[test]
fn test_excluding_skips_element() {
    let points = vec![[1.0, 1.0, 1.0], [2.0, 2.0, 2.0], [3.0, 3.0, 3.0]];
    let tree = Tree::build(&points, cube(), TreeConfig::default()).unwrap();

    let found: Vec<usize> = NeighborQuery::around(&tree, [1.0, 1.0, 1.0]).excluding(1).into_iter().collect();
    assert_eq!(found, vec![0, 2]);
}

#[test]
fn test_of_element_rejects_unknown_id() {
    let points = vec![[1.0, 1.0, 1.0]];
    let tree = Tree::build(&points, cube(), TreeConfig::default()).unwrap();
    assert!(matches!(
        NeighborQuery::of_element(&tree, 3),
        Err(TreeError::UnknownElement { element: 3 })
    ));
}

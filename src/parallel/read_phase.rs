//! Parallel read phase over a frozen tree.
//!
//! A built [`Tree`] only hands out shared references, so every query below
//! runs on the rayon pool without locks. Results are collected in element (or
//! leaf) order and are identical to the sequential ones.
use rayon::prelude::*;
use crate::queries::{FarField, FarFieldQuery, NeighborQuery};
use crate::tree::{ElementId, Leaf, NodeId, Tree, TreeElement};

/// Applies `f` to every element id in parallel.
pub fn par_map_elements<E, R, F, const D: usize>(tree: &Tree<'_, E, D>, f: F) -> Vec<R>
where
    E: TreeElement<D> + Sync,
    R: Send,
    F: Fn(ElementId) -> R + Sync + Send,
{
    (0..tree.elements().len()).into_par_iter().map(f).collect()
}

/// Applies `f` to every leaf in parallel, in depth-first leaf order.
pub fn par_map_leaves<'t, 'a, E, R, F, const D: usize>(tree: &'t Tree<'a, E, D>, f: F) -> Vec<R>
where
    E: TreeElement<D> + Sync,
    R: Send,
    F: Fn(Leaf<'t, 'a, E, D>) -> R + Sync + Send,
{
    let leaves: Vec<NodeId> = tree.leaves().map(|leaf| leaf.id()).collect();
    leaves.into_par_iter().map(|id| f(tree.leaf(id))).collect()
}

/// Neighbor lists of every element, each honoring the tree's configured
/// neighbor limit and, if given, the pruning radius.
pub fn par_neighbors<E, const D: usize>(tree: &Tree<'_, E, D>, radius: Option<f64>) -> Vec<Vec<ElementId>>
where
    E: TreeElement<D> + Sync,
{
    par_map_elements(tree, |id| {
        NeighborQuery::of_element(tree, id)
            .map(|query| match radius {
                Some(radius) => query.within(radius).into_iter().collect(),
                None => query.into_iter().collect(),
            })
            .unwrap_or_default()
    })
}

/// Near/far partition of every element, using the query's opening angle
/// and barycenter channel.
pub fn par_far_field<E, const D: usize>(query: &FarFieldQuery<'_, '_, E, D>) -> Vec<FarField>
where
    E: TreeElement<D> + Sync,
{
    (0..query.tree().elements().len())
        .into_par_iter()
        .map(|id| query.for_element(id).unwrap_or_default())
        .collect()
}

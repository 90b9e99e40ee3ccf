//! The tree façade: one build per simulation tick, read-only afterwards.
//!
//! A tick follows the same four steps every time:
//!
//! 1. compute the domain (usually the element extents plus a little padding),
//! 2. bulk-insert every element with a [`TreeBuilder`],
//! 3. run the bottom-up barycenter pass ([`TreeBuilder::finish`]),
//! 4. query the frozen [`Tree`] from as many threads as needed, then drop it.
//!
//! Mutation is confined to the builder. A finished `Tree` only hands out
//! shared references, so it can be queried in parallel without locks.
//!
//! # Example
//!
//! ```
//! use rs_orthtree::geometry::BoundingRegion;
//! use rs_orthtree::tree::Tree;
//! use rs_orthtree::utils::TreeConfig;
//!
//! let points = vec![[1.0, 1.0], [2.0, 8.0], [7.0, 3.0], [9.0, 9.0]];
//! let region = BoundingRegion::new([0.0, 0.0], [10.0, 10.0]).unwrap();
//! let config = TreeConfig::default().with_capacity(2);
//!
//! let tree = Tree::build(&points, region, config).unwrap();
//! assert_eq!(tree.len(), 4);
//! assert!(!tree.root().is_leaf());
//!
//! let leaf = tree.find_leaf(&[7.0, 3.0]);
//! assert!(tree.leaf(leaf).contains(2));
//! ```
use log::debug;
use crate::aggregation::{Aggregate, IncrementalBarycenter};
use crate::geometry::BoundingRegion;
use crate::tree::node::{aggregate_nodes, NodeArena};
use crate::tree::{ElementId, NodeId, NodeKind, SpatialNode, TreeElement};
use crate::utils::{TreeConfig, TreeError};
#[cfg(feature = "neighbor-query")]
use crate::queries::NeighborQuery;

/// Mutable build phase of a [`Tree`].
///
/// Dropping a builder abandons the rebuild without side effects.
pub struct TreeBuilder<'a, E, const D: usize> {
    elements: &'a [E],
    config: TreeConfig,
    arena: NodeArena<D>,
    inserted: Vec<bool>,
}

impl<'a, E: TreeElement<D>, const D: usize> TreeBuilder<'a, E, D> {
    /// Starts a build over `elements` inside `region`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(elements: &'a [E], region: BoundingRegion<D>, config: TreeConfig) -> Result<Self, TreeError> {
        config.validate()?;
        Ok(Self {
            elements,
            config,
            arena: NodeArena::new(region, config.capacity, config.max_depth),
            inserted: vec![false; elements.len()],
        })
    }

    /// Inserts one element by index.
    ///
    /// # Errors
    ///
    /// * `TreeError::UnknownElement` if `id` is not an index of the slice.
    /// * `TreeError::DuplicateElement` if `id` was inserted before.
    /// * `TreeError::OutOfBounds` if the element lies outside the root region.
    ///   The tree never grows to fit; size the root over all elements first.
    pub fn insert(&mut self, id: ElementId) -> Result<(), TreeError> {
        match self.inserted.get(id) {
            None => return Err(TreeError::UnknownElement { element: id }),
            Some(true) => return Err(TreeError::DuplicateElement { element: id }),
            Some(false) => {}
        }
        if let Err(err) = self.arena.insert(self.elements, id) {
            log::warn!("Rejected element {}: {}", id, err);
            return Err(err);
        }
        self.inserted[id] = true;
        Ok(())
    }

    /// Inserts every element in slice order.
    pub fn insert_all(&mut self) -> Result<(), TreeError> {
        for id in 0..self.elements.len() {
            self.insert(id)?;
        }
        Ok(())
    }

    /// Runs the bottom-up barycenter pass and freezes the tree.
    pub fn finish(self) -> Tree<'a, E, D> {
        let TreeBuilder { elements, config, arena, .. } = self;
        let mut nodes = arena.into_nodes();

        let barycenters = aggregate_nodes(&nodes, elements, |element| element.weight());
        for (node, barycenter) in nodes.iter_mut().zip(barycenters) {
            node.barycenter = barycenter;
        }

        let mut leaf_of = vec![None; elements.len()];
        for (index, node) in nodes.iter().enumerate() {
            for id in node.elements() {
                leaf_of[id] = Some(NodeId::new(index));
            }
        }

        let tree = Tree { elements, config, nodes, leaf_of };
        if log::log_enabled!(log::Level::Debug) {
            debug!("Built tree over {} elements: {:?}", tree.len(), tree.stats());
        }
        tree
    }
}

/// Shape summary of a built tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub empty_leaves: usize,
    pub elements: usize,
    /// Deepest level holding a node (the root is level 0).
    pub depth: usize,
    pub overflow_leaves: usize,
    pub overflow_elements: usize,
}

/// An immutable spatial tree over a borrowed slice of elements.
pub struct Tree<'a, E, const D: usize> {
    elements: &'a [E],
    config: TreeConfig,
    nodes: Vec<SpatialNode<D>>,
    leaf_of: Vec<Option<NodeId>>,
}

impl<'a, E: TreeElement<D>, const D: usize> Tree<'a, E, D> {
    /// Builds a tree holding every element of `elements`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid config or when an element lies outside `region`.
    pub fn build(elements: &'a [E], region: BoundingRegion<D>, config: TreeConfig) -> Result<Self, TreeError> {
        let mut builder = TreeBuilder::new(elements, region, config)?;
        builder.insert_all()?;
        Ok(builder.finish())
    }

    /// Builds a tree whose root region is the padded extent of the elements
    /// (see [`BoundingRegion::enclosing`] and [`TreeConfig::domain_padding`]).
    ///
    /// # Errors
    ///
    /// Fails on an invalid config, an empty slice or non-finite positions.
    pub fn build_enclosing(elements: &'a [E], config: TreeConfig) -> Result<Self, TreeError> {
        config.validate()?;
        let region = BoundingRegion::enclosing(
            elements.iter().map(|element| element.position()),
            config.domain_padding,
        )?;
        Self::build(elements, region, config)
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The slice this tree indexes.
    pub fn elements(&self) -> &'a [E] {
        self.elements
    }

    pub fn element(&self, id: ElementId) -> &'a E {
        &self.elements[id]
    }

    pub fn root(&self) -> &SpatialNode<D> {
        &self.nodes[NodeId::ROOT.index()]
    }

    pub fn region(&self) -> &BoundingRegion<D> {
        self.root().region()
    }

    pub fn node(&self, id: NodeId) -> &SpatialNode<D> {
        &self.nodes[id.index()]
    }

    /// All nodes in arena order.
    pub fn nodes(&self) -> &[SpatialNode<D>] {
        &self.nodes
    }

    /// Number of elements stored in the tree.
    pub fn len(&self) -> usize {
        self.root().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn barycenter(&self, id: NodeId) -> &IncrementalBarycenter<D> {
        self.node(id).barycenter()
    }

    /// Descends from the root to the leaf whose region holds `point`.
    ///
    /// A point outside the root region (typically an element that moved
    /// since the last rebuild) is looked up at the root's left corner
    /// instead. The answer is then only an approximation, but the lookup
    /// never fails.
    pub fn find_leaf(&self, point: &[f64; D]) -> NodeId {
        let region = self.region();
        let target = if region.contains(point) {
            *point
        } else {
            log::trace!("Point {:?} is outside the root region; searching from its left corner", point);
            *region.left()
        };

        let mut current = NodeId::ROOT;
        while let Some(child) = self.node(current).choose_child(&target) {
            current = child;
        }
        current
    }

    /// Leaf the element was stored in at build time, if it was inserted.
    pub fn leaf_of(&self, id: ElementId) -> Option<NodeId> {
        self.leaf_of.get(id).copied().flatten()
    }

    /// Handle for the node `id`, normally a leaf.
    pub fn leaf(&self, id: NodeId) -> Leaf<'_, 'a, E, D> {
        Leaf { tree: self, id }
    }

    /// Lazy depth-first walk over every leaf, children in bitmask order.
    /// Empty leaves are included.
    pub fn leaves(&self) -> Leaves<'_, 'a, E, D> {
        self.leaves_under(NodeId::ROOT)
    }

    /// Lazy depth-first walk over the leaves of the subtree rooted at `id`.
    pub fn leaves_under(&self, id: NodeId) -> Leaves<'_, 'a, E, D> {
        Leaves { tree: self, stack: vec![id] }
    }

    /// Every stored element, leaf by leaf.
    pub fn all_elements(&self) -> SubtreeElements<'_, 'a, E, D> {
        self.subtree_elements(NodeId::ROOT)
    }

    /// Every element stored in the subtree rooted at `id`.
    pub fn subtree_elements(&self, id: NodeId) -> SubtreeElements<'_, 'a, E, D> {
        SubtreeElements { leaves: self.leaves_under(id), current: None }
    }

    /// Runs the bottom-up barycenter pass for another weight attribute.
    ///
    /// The tree's own barycenters use [`TreeElement::weight`]; this computes
    /// an independent channel (charge, for example) over the same nodes.
    pub fn aggregate<F>(&self, weight: F) -> Aggregate<D>
    where
        F: Fn(&E) -> f64,
    {
        Aggregate::from_barycenters(aggregate_nodes(&self.nodes, self.elements, weight))
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats { nodes: self.nodes.len(), elements: self.len(), ..TreeStats::default() };
        for node in &self.nodes {
            stats.depth = stats.depth.max(node.depth());
            if let NodeKind::Leaf { overflow, .. } = node.kind() {
                stats.leaves += 1;
                if node.is_empty() {
                    stats.empty_leaves += 1;
                }
                if !overflow.is_empty() {
                    stats.overflow_leaves += 1;
                    stats.overflow_elements += overflow.len();
                }
            }
        }
        stats
    }
}

/// Iterator returned by [`Tree::leaves`].
pub struct Leaves<'t, 'a, E, const D: usize> {
    tree: &'t Tree<'a, E, D>,
    stack: Vec<NodeId>,
}

impl<'t, 'a, E: TreeElement<D>, const D: usize> Iterator for Leaves<'t, 'a, E, D> {
    type Item = Leaf<'t, 'a, E, D>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let node = self.tree.node(id);
            if node.is_leaf() {
                return Some(Leaf { tree: self.tree, id });
            }
            self.stack.extend(node.children().rev());
        }
        None
    }
}

/// Iterator returned by [`Tree::subtree_elements`].
pub struct SubtreeElements<'t, 'a, E, const D: usize> {
    leaves: Leaves<'t, 'a, E, D>,
    current: Option<(&'t SpatialNode<D>, usize)>,
}

impl<'t, 'a, E: TreeElement<D>, const D: usize> Iterator for SubtreeElements<'t, 'a, E, D> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        loop {
            if let Some((node, position)) = self.current {
                if let Some(id) = node.element_at(position) {
                    self.current = Some((node, position + 1));
                    return Some(id);
                }
            }
            let leaf = self.leaves.next()?;
            self.current = Some((leaf.node(), 0));
        }
    }
}

/// A leaf of a built tree together with the tree it belongs to.
pub struct Leaf<'t, 'a, E, const D: usize> {
    tree: &'t Tree<'a, E, D>,
    id: NodeId,
}

impl<'t, 'a, E, const D: usize> Clone for Leaf<'t, 'a, E, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'t, 'a, E, const D: usize> Copy for Leaf<'t, 'a, E, D> {}

impl<'t, 'a, E: TreeElement<D>, const D: usize> Leaf<'t, 'a, E, D> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'t SpatialNode<D> {
        self.tree.node(self.id)
    }

    pub fn region(&self) -> &'t BoundingRegion<D> {
        self.node().region()
    }

    pub fn barycenter(&self) -> &'t IncrementalBarycenter<D> {
        self.node().barycenter()
    }

    /// Elements stored in this leaf.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + 't {
        self.node().elements()
    }

    pub fn len(&self) -> usize {
        self.node().count()
    }

    pub fn is_empty(&self) -> bool {
        self.node().is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.node().elements().any(|stored| stored == id)
    }

    /// Neighbor sequence starting from this leaf.
    #[cfg(feature = "neighbor-query")]
    pub fn neighbors(&self) -> NeighborQuery<'t, 'a, E, D> {
        NeighborQuery::from_node(self.tree, self.id)
    }
}

use crate::tree::{ElementId, NodeId, SpatialNode, Tree, TreeElement};
use crate::utils::TreeError;

/// Upward-expanding neighbor lookup for local interaction rules.
///
/// Yields the elements of the starting leaf first, then walks up through the
/// ancestors and, at each one, enumerates every sibling subtree that was not
/// the branch just ascended from. The result is *approximately* nearest-first
/// (own leaf, then widening rings of siblings). It is not a sorted k-nearest
/// search; taking the first `k` results is a cheap early-exit policy.
///
/// With [`NeighborQuery::within`], subtrees whose region misses the box
/// `[origin - radius, origin + radius]` are pruned without being visited.
/// Pruning works on whole regions, so elements of a visited leaf may still lie
/// outside the radius; callers filter by exact distance.
///
/// # Examples
///
/// ```
/// use rs_orthtree::geometry::BoundingRegion;
/// use rs_orthtree::queries::NeighborQuery;
/// use rs_orthtree::tree::Tree;
/// use rs_orthtree::utils::TreeConfig;
///
/// let points = vec![[1.0, 1.0], [1.5, 1.2], [8.0, 8.0], [9.0, 2.0]];
/// let region = BoundingRegion::new([0.0, 0.0], [10.0, 10.0]).unwrap();
/// let tree = Tree::build(&points, region, TreeConfig::default().with_capacity(1)).unwrap();
///
/// let neighbors: Vec<usize> = NeighborQuery::of_element(&tree, 0).unwrap().into_iter().collect();
/// assert_eq!(neighbors[0], 1); // same quadrant first
/// assert_eq!(neighbors.len(), 3);
///
/// let close: Vec<usize> = NeighborQuery::of_element(&tree, 0).unwrap()
///     .within(2.0)
///     .into_iter()
///     .collect();
/// assert_eq!(close, vec![1]);
/// ```
pub struct NeighborQuery<'t, 'a, E, const D: usize> {
    tree: &'t Tree<'a, E, D>,
    start: NodeId,
    origin: [f64; D],
    radius: Option<f64>,
    limit: Option<usize>,
    exclude: Option<ElementId>,
}

impl<'t, 'a, E, const D: usize> Clone for NeighborQuery<'t, 'a, E, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'t, 'a, E, const D: usize> Copy for NeighborQuery<'t, 'a, E, D> {}

impl<'t, 'a, E: TreeElement<D>, const D: usize> NeighborQuery<'t, 'a, E, D> {
    /// Starts at `node`, normally a leaf, using its center as the origin.
    pub fn from_node(tree: &'t Tree<'a, E, D>, node: NodeId) -> Self {
        Self {
            tree,
            start: node,
            origin: *tree.node(node).region().center(),
            radius: None,
            limit: tree.config().neighbor_limit,
            exclude: None,
        }
    }

    /// Starts at the leaf whose region holds `point`.
    ///
    /// A point outside the root region starts from the leaf at the root's
    /// left corner (see [`Tree::find_leaf`]).
    pub fn around(tree: &'t Tree<'a, E, D>, point: [f64; D]) -> Self {
        Self { origin: point, ..Self::from_node(tree, tree.find_leaf(&point)) }
    }

    /// Neighbors of element `id`, never including `id` itself.
    ///
    /// # Errors
    ///
    /// Returns `TreeError::UnknownElement` if `id` is not an index of the
    /// tree's element slice.
    pub fn of_element(tree: &'t Tree<'a, E, D>, id: ElementId) -> Result<Self, TreeError> {
        let element = tree.elements().get(id).ok_or(TreeError::UnknownElement { element: id })?;
        let origin = element.position();
        let start = tree.leaf_of(id).unwrap_or_else(|| tree.find_leaf(&origin));
        Ok(Self { origin, exclude: Some(id), ..Self::from_node(tree, start) })
    }

    /// Prunes subtrees that miss the box of half-width `radius` around the origin.
    pub fn within(mut self, radius: f64) -> Self {
        self.radius = Some(radius.abs());
        self
    }

    /// Stops after `limit` elements.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Lifts the configured default limit.
    pub fn without_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Skips element `id` in the results.
    pub fn excluding(mut self, id: ElementId) -> Self {
        self.exclude = Some(id);
        self
    }

    pub fn origin(&self) -> &[f64; D] {
        &self.origin
    }

    pub fn start(&self) -> NodeId {
        self.start
    }
}

impl<'t, 'a, E: TreeElement<D>, const D: usize> IntoIterator for NeighborQuery<'t, 'a, E, D> {
    type Item = ElementId;
    type IntoIter = Neighbors<'t, 'a, E, D>;

    fn into_iter(self) -> Self::IntoIter {
        let window = self.radius.map(|radius| {
            let mut lo = self.origin;
            let mut hi = self.origin;
            for d in 0..D {
                lo[d] -= radius;
                hi[d] += radius;
            }
            (lo, hi)
        });
        Neighbors {
            tree: self.tree,
            window,
            stack: vec![self.start],
            current: None,
            ascent: Some(self.start),
            remaining: self.limit,
            exclude: self.exclude,
        }
    }
}

/// Iterator over the results of a [`NeighborQuery`].
pub struct Neighbors<'t, 'a, E, const D: usize> {
    tree: &'t Tree<'a, E, D>,
    window: Option<([f64; D], [f64; D])>,
    /// Subtrees still to enumerate at the current ring.
    stack: Vec<NodeId>,
    /// Leaf being drained and the next position in it.
    current: Option<(&'t SpatialNode<D>, usize)>,
    /// Node whose ring is being enumerated; its siblings come next.
    ascent: Option<NodeId>,
    remaining: Option<usize>,
    exclude: Option<ElementId>,
}

impl<'t, 'a, E: TreeElement<D>, const D: usize> Neighbors<'t, 'a, E, D> {
    fn visits(&self, node: &SpatialNode<D>) -> bool {
        if node.is_empty() {
            return false;
        }
        match &self.window {
            Some((lo, hi)) => node.region().overlaps_box(lo, hi),
            None => true,
        }
    }

    /// Moves one level up and queues the siblings of the branch just left.
    /// Returns false once the root's ring is done.
    fn ascend(&mut self) -> bool {
        let Some(from) = self.ascent else {
            return false;
        };
        match self.tree.node(from).parent() {
            Some(parent) => {
                self.stack.extend(self.tree.node(parent).children().rev().filter(|&child| child != from));
                self.ascent = Some(parent);
                true
            }
            None => {
                self.ascent = None;
                false
            }
        }
    }
}

impl<'t, 'a, E: TreeElement<D>, const D: usize> Iterator for Neighbors<'t, 'a, E, D> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        if self.remaining == Some(0) {
            return None;
        }
        loop {
            if let Some((node, position)) = self.current {
                if let Some(id) = node.element_at(position) {
                    self.current = Some((node, position + 1));
                    if self.exclude == Some(id) {
                        continue;
                    }
                    if let Some(remaining) = self.remaining.as_mut() {
                        *remaining -= 1;
                    }
                    return Some(id);
                }
                self.current = None;
            }

            if let Some(id) = self.stack.pop() {
                let node = self.tree.node(id);
                if !self.visits(node) {
                    continue;
                }
                if node.is_leaf() {
                    self.current = Some((node, 0));
                } else {
                    self.stack.extend(node.children().rev());
                }
                continue;
            }

            if !self.ascend() {
                return None;
            }
        }
    }
}

use log::debug;
use crate::aggregation::IncrementalBarycenter;
use crate::geometry::BoundingRegion;
use crate::tree::{ElementId, TreeElement};
use crate::utils::TreeError;

/// Index of a node in the tree's node arena.
///
/// The root is always [`NodeId::ROOT`]. The 2^D children of an inner node
/// occupy consecutive slots, in bitmask order, and are always allocated after
/// their parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Position of this node in the arena.
    pub fn index(self) -> usize {
        self.0
    }

    pub(crate) fn offset(self, by: usize) -> Self {
        NodeId(self.0 + by)
    }
}

/// Contents of a node: either a bin of elements or a block of children.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A leaf. `bin` never exceeds the configured capacity; `overflow` only
    /// fills up on leaves that may not split any further.
    Leaf { bin: Vec<ElementId>, overflow: Vec<ElementId> },
    /// An inner node owning the 2^D children starting at `first_child`.
    Inner { first_child: NodeId },
}

/// One node of the spatial tree.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialNode<const D: usize> {
    region: BoundingRegion<D>,
    depth: usize,
    parent: Option<NodeId>,
    count: usize,
    pub(crate) barycenter: IncrementalBarycenter<D>,
    kind: NodeKind,
}

impl<const D: usize> SpatialNode<D> {
    pub(crate) fn leaf(region: BoundingRegion<D>, depth: usize, parent: Option<NodeId>) -> Self {
        Self {
            barycenter: IncrementalBarycenter::new(*region.center()),
            region,
            depth,
            parent,
            count: 0,
            kind: NodeKind::Leaf { bin: Vec::new(), overflow: Vec::new() },
        }
    }

    pub fn region(&self) -> &BoundingRegion<D> {
        &self.region
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Non-owning link to the parent; `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Number of elements stored anywhere in this subtree.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn barycenter(&self) -> &IncrementalBarycenter<D> {
        &self.barycenter
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Children in bitmask order; empty for a leaf.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeId> + ExactSizeIterator {
        let range = match self.kind {
            NodeKind::Inner { first_child } => {
                first_child.index()..first_child.index() + BoundingRegion::<D>::CHILDREN
            }
            NodeKind::Leaf { .. } => 0..0,
        };
        range.map(NodeId)
    }

    /// Child whose region would hold `point`, or `None` for a leaf.
    pub fn choose_child(&self, point: &[f64; D]) -> Option<NodeId> {
        match self.kind {
            NodeKind::Inner { first_child } => Some(first_child.offset(self.region.child_index(point))),
            NodeKind::Leaf { .. } => None,
        }
    }

    /// Elements stored directly in this node (bin first, then overflow).
    /// Always empty for inner nodes.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        let (bin, overflow): (&[ElementId], &[ElementId]) = match &self.kind {
            NodeKind::Leaf { bin, overflow } => (bin.as_slice(), overflow.as_slice()),
            NodeKind::Inner { .. } => (&[], &[]),
        };
        bin.iter().chain(overflow.iter()).copied()
    }

    pub(crate) fn element_at(&self, position: usize) -> Option<ElementId> {
        match &self.kind {
            NodeKind::Leaf { bin, overflow } => {
                bin.get(position).or_else(|| overflow.get(position - bin.len())).copied()
            }
            NodeKind::Inner { .. } => None,
        }
    }

    /// Overflowed elements; non-empty only on leaves at the depth limit.
    pub fn overflow(&self) -> &[ElementId] {
        match &self.kind {
            NodeKind::Leaf { overflow, .. } => overflow.as_slice(),
            NodeKind::Inner { .. } => &[],
        }
    }

    fn push(&mut self, id: ElementId, spill: bool) {
        if let NodeKind::Leaf { bin, overflow } = &mut self.kind {
            if spill { overflow.push(id) } else { bin.push(id) }
            self.count += 1;
        }
    }
}

/// What an insertion does at the node it is currently looking at.
enum Step {
    Descend(NodeId),
    Store,
    Spill,
    Split,
}

/// Flat storage for the nodes of a tree under construction.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<const D: usize> {
    nodes: Vec<SpatialNode<D>>,
    capacity: usize,
    max_depth: usize,
}

impl<const D: usize> NodeArena<D> {
    pub(crate) fn new(region: BoundingRegion<D>, capacity: usize, max_depth: usize) -> Self {
        Self {
            nodes: vec![SpatialNode::leaf(region, 0, None)],
            capacity,
            max_depth,
        }
    }

    pub(crate) fn root(&self) -> &SpatialNode<D> {
        &self.nodes[NodeId::ROOT.index()]
    }

    pub(crate) fn into_nodes(self) -> Vec<SpatialNode<D>> {
        self.nodes
    }

    /// Routes element `id` from the root down to a leaf, splitting full
    /// leaves on the way.
    ///
    /// A full leaf splits once into 2^D children and hands its bin down by the
    /// center bitmask. Leaves at `max_depth`, or whose region can no longer be
    /// halved, keep the element in their overflow list instead, which bounds
    /// the depth reached by piles of coincident elements.
    pub(crate) fn insert<E: TreeElement<D>>(&mut self, elements: &[E], id: ElementId) -> Result<(), TreeError> {
        let point = elements[id].position();
        if !self.root().region().contains(&point) {
            return Err(TreeError::OutOfBounds { element: id });
        }

        let mut current = NodeId::ROOT;
        loop {
            let step = {
                let node = &self.nodes[current.index()];
                match &node.kind {
                    NodeKind::Inner { first_child } => {
                        Step::Descend(first_child.offset(node.region.child_index(&point)))
                    }
                    NodeKind::Leaf { bin, .. } if bin.len() < self.capacity => Step::Store,
                    NodeKind::Leaf { .. } if node.depth >= self.max_depth || !node.region.is_divisible() => {
                        Step::Spill
                    }
                    NodeKind::Leaf { .. } => Step::Split,
                }
            };

            match step {
                Step::Descend(child) => {
                    self.nodes[current.index()].count += 1;
                    current = child;
                }
                Step::Store => {
                    self.nodes[current.index()].push(id, false);
                    return Ok(());
                }
                Step::Spill => {
                    let node = &mut self.nodes[current.index()];
                    if node.overflow().is_empty() {
                        debug!(
                            "Leaf {:?} at depth {} is full and cannot split; spilling element {} to overflow",
                            current, node.depth, id
                        );
                    }
                    node.push(id, true);
                    return Ok(());
                }
                Step::Split => self.split(current, elements),
            }
        }
    }

    /// Turns a full leaf into an inner node and redistributes its bin.
    fn split<E: TreeElement<D>>(&mut self, id: NodeId, elements: &[E]) {
        let region = self.nodes[id.index()].region;
        let depth = self.nodes[id.index()].depth;
        let first_child = NodeId(self.nodes.len());

        for child_region in region.subdivide() {
            self.nodes.push(SpatialNode::leaf(child_region, depth + 1, Some(id)));
        }

        let previous = std::mem::replace(&mut self.nodes[id.index()].kind, NodeKind::Inner { first_child });
        if let NodeKind::Leaf { bin, overflow } = previous {
            debug_assert!(overflow.is_empty(), "splitting a leaf that already overflowed");
            for element in bin {
                let child = first_child.offset(region.child_index(&elements[element].position()));
                self.nodes[child.index()].push(element, false);
            }
        }
    }
}

/// Computes one barycenter per node in a single bottom-up sweep.
///
/// Children always sit after their parent in the arena, so walking it in
/// reverse visits every child before its parent. Leaves average their
/// elements; inner nodes average their children's barycenters weighted by
/// each child's total weight. Every element is touched exactly once.
pub(crate) fn aggregate_nodes<E, F, const D: usize>(
    nodes: &[SpatialNode<D>],
    elements: &[E],
    weight: F,
) -> Vec<IncrementalBarycenter<D>>
where
    E: TreeElement<D>,
    F: Fn(&E) -> f64,
{
    let mut barycenters: Vec<IncrementalBarycenter<D>> = nodes.iter()
        .map(|node| IncrementalBarycenter::new(*node.region.center()))
        .collect();

    for index in (0..nodes.len()).rev() {
        let mut barycenter = barycenters[index];
        match &nodes[index].kind {
            NodeKind::Leaf { .. } => {
                for id in nodes[index].elements() {
                    let element = &elements[id];
                    barycenter.update(&element.position(), weight(element));
                }
            }
            NodeKind::Inner { .. } => {
                for child in nodes[index].children() {
                    barycenter.merge(&barycenters[child.index()]);
                }
            }
        }
        barycenters[index] = barycenter;
    }

    barycenters
}

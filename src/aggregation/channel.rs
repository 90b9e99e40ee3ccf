use crate::aggregation::IncrementalBarycenter;
use crate::tree::NodeId;

/// One barycenter per tree node for a single weight attribute.
///
/// The tree's own barycenters track [`TreeElement::weight`]; an `Aggregate`
/// tracks any other attribute (charge, luminosity, ...) over the same
/// structure. It is produced by [`Tree::aggregate`] and indexed by `NodeId`,
/// and stays valid exactly as long as the tree it was computed from.
///
/// Weights fed into a channel must be non-negative, since a barycenter is only
/// defined for a non-negative total weight.
///
/// [`TreeElement::weight`]: crate::tree::TreeElement::weight
/// [`Tree::aggregate`]: crate::tree::Tree::aggregate
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate<const D: usize> {
    barycenters: Vec<IncrementalBarycenter<D>>,
}

impl<const D: usize> Aggregate<D> {
    pub(crate) fn from_barycenters(barycenters: Vec<IncrementalBarycenter<D>>) -> Self {
        Self { barycenters }
    }

    /// Barycenter of the subtree rooted at `node`.
    pub fn get(&self, node: NodeId) -> &IncrementalBarycenter<D> {
        &self.barycenters[node.index()]
    }

    /// Number of nodes covered; equals the node count of the source tree.
    pub fn len(&self) -> usize {
        self.barycenters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barycenters.is_empty()
    }

    /// Total weight of the whole tree in this channel.
    pub fn total_weight(&self) -> f64 {
        self.barycenters.first().map_or(0.0, |root| root.total_weight())
    }
}

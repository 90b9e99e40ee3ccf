use crate::aggregation::{Aggregate, IncrementalBarycenter};
use crate::tree::{ElementId, NodeId, NodeKind, Tree, TreeElement};
use crate::utils::{distance_squared, TreeError, ZERO_DISTANCE_EPSILON};

/// Near/far partition of the domain as seen from one source.
///
/// Every element other than the source is covered exactly once: either it is
/// listed in `near`, or it lies inside exactly one node listed in `far`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FarField {
    /// Elements that need an exact pairwise interaction.
    pub near: Vec<ElementId>,
    /// Subtrees approximated by their barycenter.
    pub far: Vec<NodeId>,
    /// Members of `near` sitting at (numerically) zero distance from the
    /// source. A `1 / distance²` law must not be applied to them as is.
    pub coincident: Vec<ElementId>,
}

impl FarField {
    /// Number of elements covered by the partition.
    pub fn covered<E: TreeElement<D>, const D: usize>(&self, tree: &Tree<'_, E, D>) -> usize {
        self.near.len() + self.far.iter().map(|&node| tree.node(node).count()).sum::<usize>()
    }

    pub fn clear(&mut self) {
        self.near.clear();
        self.far.clear();
        self.coincident.clear();
    }
}

/// Barnes-Hut opening-angle traversal.
///
/// Starting at the source leaf, the query walks up through the ancestors. At
/// each one, every sibling subtree not yet visited is classified against the
/// source position:
///
/// * empty subtrees are skipped;
/// * a subtree whose barycenter coincides with the source goes to the near
///   field whole, since it cannot be treated as a point mass;
/// * a subtree with `size / distance < theta` becomes one far-field aggregate;
/// * anything else is opened, down to leaves whose elements join the near field.
///
/// Sizes and distances are compared squared. With `theta == 0` nothing is
/// ever approximated and the result degenerates to brute force.
///
/// # Examples
///
/// ```
/// use rs_orthtree::geometry::BoundingRegion;
/// use rs_orthtree::queries::FarFieldQuery;
/// use rs_orthtree::tree::Tree;
/// use rs_orthtree::utils::TreeConfig;
///
/// let points = vec![[1.0, 1.0], [1.2, 1.1], [9.0, 9.0], [9.2, 8.9], [8.8, 9.3]];
/// let region = BoundingRegion::new([0.0, 0.0], [10.0, 10.0]).unwrap();
/// let tree = Tree::build(&points, region, TreeConfig::default().with_capacity(2)).unwrap();
///
/// let field = FarFieldQuery::new(&tree).with_theta(1.0).unwrap().for_element(0).unwrap();
/// assert_eq!(field.near, vec![1]);
/// assert_eq!(field.far.len(), 1);
/// assert_eq!(field.covered(&tree), points.len() - 1);
/// ```
pub struct FarFieldQuery<'t, 'a, E, const D: usize> {
    tree: &'t Tree<'a, E, D>,
    theta: f64,
    channel: Option<&'t Aggregate<D>>,
}

impl<'t, 'a, E: TreeElement<D>, const D: usize> FarFieldQuery<'t, 'a, E, D> {
    /// Query with the tree's configured opening angle and its own
    /// (weight) barycenters.
    pub fn new(tree: &'t Tree<'a, E, D>) -> Self {
        Self { tree, theta: tree.config().theta, channel: None }
    }

    /// Overrides the opening angle.
    ///
    /// # Errors
    ///
    /// Returns `TreeError::InvalidTheta` for a negative or non-finite angle.
    pub fn with_theta(mut self, theta: f64) -> Result<Self, TreeError> {
        if !theta.is_finite() || theta < 0.0 {
            return Err(TreeError::InvalidTheta);
        }
        self.theta = theta;
        Ok(self)
    }

    /// Measures distances to the barycenters of `channel` instead of the
    /// tree's own. The channel must come from [`Tree::aggregate`] on the same tree.
    pub fn with_channel(mut self, channel: &'t Aggregate<D>) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn tree(&self) -> &'t Tree<'a, E, D> {
        self.tree
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Barycenter of `node` in the active channel.
    pub fn barycenter(&self, node: NodeId) -> &'t IncrementalBarycenter<D> {
        match self.channel {
            Some(channel) => channel.get(node),
            None => self.tree.node(node).barycenter(),
        }
    }

    /// Partition seen from element `id`, which is itself excluded.
    ///
    /// # Errors
    ///
    /// Returns `TreeError::UnknownElement` if `id` is not an index of the
    /// tree's element slice.
    pub fn for_element(&self, id: ElementId) -> Result<FarField, TreeError> {
        let mut field = FarField::default();
        self.for_element_into(id, &mut field)?;
        Ok(field)
    }

    /// Like [`FarFieldQuery::for_element`], reusing the buffers of `field`.
    pub fn for_element_into(&self, id: ElementId, field: &mut FarField) -> Result<(), TreeError> {
        let element = self.tree.elements().get(id).ok_or(TreeError::UnknownElement { element: id })?;
        let source = element.position();
        let leaf = self.tree.leaf_of(id).unwrap_or_else(|| self.tree.find_leaf(&source));

        field.clear();
        for other in self.tree.node(leaf).elements().filter(|&other| other != id) {
            self.push_near(&source, other, field);
        }
        self.walk_up(&source, leaf, field);
        Ok(())
    }

    /// Partition seen from a whole leaf, measured from its barycenter.
    ///
    /// The leaf's own elements are the source and are left out; interactions
    /// inside the leaf are up to the caller.
    pub fn for_leaf(&self, leaf: NodeId) -> FarField {
        let mut field = FarField::default();
        let source = *self.barycenter(leaf).position();
        self.walk_up(&source, leaf, &mut field);
        field
    }

    fn walk_up(&self, source: &[f64; D], leaf: NodeId, field: &mut FarField) {
        let mut from = leaf;
        while let Some(parent) = self.tree.node(from).parent() {
            for sibling in self.tree.node(parent).children().filter(|&child| child != from) {
                self.collect_far_field(source, sibling, field);
            }
            from = parent;
        }
    }

    fn collect_far_field(&self, source: &[f64; D], node: NodeId, field: &mut FarField) {
        let spatial = self.tree.node(node);
        if spatial.is_empty() {
            return;
        }

        let dist_sq = distance_squared(source, self.barycenter(node).position());
        if dist_sq <= ZERO_DISTANCE_EPSILON * ZERO_DISTANCE_EPSILON {
            for id in self.tree.subtree_elements(node) {
                self.push_near(source, id, field);
            }
            return;
        }

        let size = spatial.region().max_extent();
        if size * size < self.theta * self.theta * dist_sq {
            field.far.push(node);
            return;
        }

        match spatial.kind() {
            NodeKind::Leaf { .. } => {
                for id in spatial.elements() {
                    self.push_near(source, id, field);
                }
            }
            NodeKind::Inner { .. } => {
                for child in spatial.children() {
                    self.collect_far_field(source, child, field);
                }
            }
        }
    }

    fn push_near(&self, source: &[f64; D], id: ElementId, field: &mut FarField) {
        let position = self.tree.element(id).position();
        if distance_squared(source, &position) <= ZERO_DISTANCE_EPSILON * ZERO_DISTANCE_EPSILON {
            field.coincident.push(id);
        }
        field.near.push(id);
    }
}

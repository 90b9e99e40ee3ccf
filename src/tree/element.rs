/// Index of an element in the slice a tree was built from.
///
/// Elements are owned by the caller; the tree only records their indices.
pub type ElementId = usize;

/// Capability every element stored in a tree must provide.
///
/// Flocking-style callers only need a position; gravity-style callers also
/// report a weight (mass), which the tree aggregates into per-node
/// barycenters. Other attributes can be aggregated on demand with
/// [`Tree::aggregate`](crate::tree::Tree::aggregate).
///
/// # Examples
///
/// ```
/// use rs_orthtree::tree::TreeElement;
///
/// struct Body {
///     position: [f64; 3],
///     mass: f64,
/// }
///
/// impl TreeElement<3> for Body {
///     fn position(&self) -> [f64; 3] {
///         self.position
///     }
///
///     fn weight(&self) -> f64 {
///         self.mass
///     }
/// }
///
/// let body = Body { position: [1.0, 2.0, 3.0], mass: 5.0 };
/// assert_eq!(body.weight(), 5.0);
/// // Bare points carry unit weight.
/// let point = [1.0, 2.0];
/// assert_eq!(TreeElement::<2>::weight(&point), 1.0);
/// ```
pub trait TreeElement<const D: usize> {
    /// Current position of the element.
    fn position(&self) -> [f64; D];

    /// Weight used by the tree's barycenters; must be non-negative.
    fn weight(&self) -> f64 {
        1.0
    }
}

impl<const D: usize> TreeElement<D> for [f64; D] {
    fn position(&self) -> [f64; D] {
        *self
    }
}

impl<const D: usize, T: TreeElement<D> + ?Sized> TreeElement<D> for &T {
    fn position(&self) -> [f64; D] {
        (**self).position()
    }

    fn weight(&self) -> f64 {
        (**self).weight()
    }
}

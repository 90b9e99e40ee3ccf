use crate::utils::{is_finite_point, midpoint, TreeError};

/// Represents an axis-aligned box in D-dimensional space.
///
/// This structure defines the boundaries of every node in the tree. A region
/// stores its lower (`left`) and upper (`right`) corners and caches its center,
/// which is the splitting point used by [`BoundingRegion::subdivide`] and
/// [`BoundingRegion::child_index`].
///
/// Containment is half-open: a point belongs to the region when
/// `left[d] <= point[d] < right[d]` for every dimension. Points on a shared
/// face therefore have exactly one owner among sibling regions.
///
/// # Examples
///
/// ```
/// use rs_orthtree::geometry::BoundingRegion;
///
/// // Corners are normalized, so the order of the two points does not matter.
/// let region = BoundingRegion::new([10.0, 10.0], [0.0, 0.0]).unwrap();
/// assert_eq!(region.left(), &[0.0, 0.0]);
/// assert_eq!(region.center(), &[5.0, 5.0]);
///
/// assert!(region.contains(&[0.0, 9.99]));
/// assert!(!region.contains(&[10.0, 5.0])); // upper bound is exclusive
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingRegion<const D: usize> {
    left: [f64; D],
    right: [f64; D],
    center: [f64; D],
}

impl<const D: usize> BoundingRegion<D> {
    /// Number of children produced by one subdivision (2^D).
    pub const CHILDREN: usize = 1 << D;

    /// Creates a region spanning the two corners.
    ///
    /// # Errors
    ///
    /// Returns `TreeError::NonFiniteCoordinate` if any coordinate is NaN or
    /// infinite and `TreeError::DegenerateRegion` if the corners share a
    /// coordinate in some dimension. Callers bounding a set of coincident
    /// points should pad the extents (see [`BoundingRegion::enclosing`]).
    pub fn new(corner_a: [f64; D], corner_b: [f64; D]) -> Result<Self, TreeError> {
        if !is_finite_point(&corner_a) || !is_finite_point(&corner_b) {
            return Err(TreeError::NonFiniteCoordinate);
        }
        let mut left = [0.0; D];
        let mut right = [0.0; D];
        for d in 0..D {
            left[d] = corner_a[d].min(corner_b[d]);
            right[d] = corner_a[d].max(corner_b[d]);
            if left[d] >= right[d] {
                return Err(TreeError::DegenerateRegion { dimension: d });
            }
        }
        Ok(Self::from_sorted(left, right))
    }

    /// Computes a region bounding every point, padded by at least `padding`
    /// on each side.
    ///
    /// The padding is widened when needed so that the largest coordinate
    /// still falls strictly below the exclusive upper bound, and so that a
    /// set of coincident points still produces a non-degenerate volume.
    ///
    /// # Errors
    ///
    /// Returns `TreeError::EmptyInput` for an empty iterator,
    /// `TreeError::InvalidPadding` for a negative or non-finite padding and
    /// `TreeError::NonFiniteCoordinate` if any point is not finite.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_orthtree::geometry::BoundingRegion;
    ///
    /// let points = [[1.0, 2.0], [4.0, -1.0], [4.0, 2.0]];
    /// let region = BoundingRegion::enclosing(points.iter().copied(), 0.5).unwrap();
    /// assert!(points.iter().all(|p| region.contains(p)));
    /// assert_eq!(region.left(), &[0.5, -1.5]);
    /// ```
    pub fn enclosing<I>(points: I, padding: f64) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = [f64; D]>,
    {
        if !padding.is_finite() || padding < 0.0 {
            return Err(TreeError::InvalidPadding);
        }
        let mut lo = [f64::INFINITY; D];
        let mut hi = [f64::NEG_INFINITY; D];
        let mut seen = false;
        for point in points {
            if !is_finite_point(&point) {
                return Err(TreeError::NonFiniteCoordinate);
            }
            for d in 0..D {
                lo[d] = lo[d].min(point[d]);
                hi[d] = hi[d].max(point[d]);
            }
            seen = true;
        }
        if !seen {
            return Err(TreeError::EmptyInput);
        }

        let mut left = [0.0; D];
        let mut right = [0.0; D];
        for d in 0..D {
            let magnitude = lo[d].abs().max(hi[d].abs());
            let slack = padding
                .max((hi[d] - lo[d]) * 1e-9)
                .max(magnitude * 4.0 * f64::EPSILON)
                .max(f64::MIN_POSITIVE);
            left[d] = lo[d] - slack;
            right[d] = hi[d] + slack;
        }
        Self::new(left, right)
    }

    fn from_sorted(left: [f64; D], right: [f64; D]) -> Self {
        let center = midpoint(&left, &right);
        Self { left, right, center }
    }

    pub fn left(&self) -> &[f64; D] {
        &self.left
    }

    pub fn right(&self) -> &[f64; D] {
        &self.right
    }

    /// Per-dimension midpoint of the region.
    pub fn center(&self) -> &[f64; D] {
        &self.center
    }

    /// Width of the region along dimension `d`.
    pub fn extent(&self, d: usize) -> f64 {
        self.right[d] - self.left[d]
    }

    /// Largest width over all dimensions; the "size" in the opening-angle test.
    pub fn max_extent(&self) -> f64 {
        (0..D).map(|d| self.extent(d)).fold(0.0, f64::max)
    }

    /// Returns true if `point` lies in `[left, right)` in every dimension.
    pub fn contains(&self, point: &[f64; D]) -> bool {
        (0..D).all(|d| self.left[d] <= point[d] && point[d] < self.right[d])
    }

    /// Index of the child region holding `point`: bit `d` is set iff
    /// `point[d] >= center[d]`.
    ///
    /// This is the same rule [`BoundingRegion::subdivide`] uses to lay out
    /// its children, so construction and lookup never disagree.
    #[inline]
    pub fn child_index(&self, point: &[f64; D]) -> usize {
        let mut index = 0;
        for d in 0..D {
            if point[d] >= self.center[d] {
                index |= 1 << d;
            }
        }
        index
    }

    /// Region of the child at `index` (see [`BoundingRegion::child_index`]).
    pub fn child(&self, index: usize) -> Self {
        let mut left = self.left;
        let mut right = self.right;
        for d in 0..D {
            if index & (1 << d) != 0 {
                left[d] = self.center[d];
            } else {
                right[d] = self.center[d];
            }
        }
        Self::from_sorted(left, right)
    }

    /// Bisects every dimension at the center, returning the 2^D children in
    /// bitmask order.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_orthtree::geometry::BoundingRegion;
    ///
    /// let region = BoundingRegion::new([0.0, 0.0], [10.0, 10.0]).unwrap();
    /// let children = region.subdivide();
    /// assert_eq!(children.len(), 4);
    ///
    /// // Child 0b01 is "high x, low y".
    /// assert_eq!(children[0b01].left(), &[5.0, 0.0]);
    /// assert_eq!(children[0b01].right(), &[10.0, 5.0]);
    /// assert_eq!(region.child_index(&[7.0, 2.0]), 0b01);
    /// ```
    pub fn subdivide(&self) -> Vec<Self> {
        (0..Self::CHILDREN).map(|index| self.child(index)).collect()
    }

    /// True while bisecting still yields children strictly narrower than this
    /// region in every dimension.
    ///
    /// After enough halvings the center collapses onto one of the corners at
    /// `f64` precision; splitting further would create zero-width regions.
    pub fn is_divisible(&self) -> bool {
        (0..D).all(|d| self.left[d] < self.center[d] && self.center[d] < self.right[d])
    }

    /// Returns true if the closed box `[lo, hi]` intersects this region.
    pub fn overlaps_box(&self, lo: &[f64; D], hi: &[f64; D]) -> bool {
        (0..D).all(|d| lo[d] < self.right[d] && hi[d] >= self.left[d])
    }

    /// Squared distance from `point` to the nearest point of the region
    /// (zero when inside).
    pub fn distance_squared_to(&self, point: &[f64; D]) -> f64 {
        let mut sum = 0.0;
        for d in 0..D {
            let gap = if point[d] < self.left[d] {
                self.left[d] - point[d]
            } else if point[d] > self.right[d] {
                point[d] - self.right[d]
            } else {
                0.0
            };
            sum += gap * gap;
        }
        sum
    }
}

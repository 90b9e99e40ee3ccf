use approx::{AbsDiffEq, RelativeEq};

/// Running weighted average of positions.
///
/// Used for mass, charge or plain position aggregation. The accumulator keeps
/// an `origin` (normally the geometric center of the owning node) and reports
/// it as its position whenever the total weight is zero, so an empty or
/// weightless node never yields an undefined (NaN) barycenter.
///
/// # Examples
///
/// ```
/// use rs_orthtree::aggregation::IncrementalBarycenter;
///
/// let mut barycenter = IncrementalBarycenter::new([0.0, 0.0]);
/// barycenter.update(&[1.0, 0.0], 1.0);
/// barycenter.update(&[3.0, 2.0], 1.0);
///
/// assert_eq!(barycenter.position(), &[2.0, 1.0]);
/// assert_eq!(barycenter.total_weight(), 2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IncrementalBarycenter<const D: usize> {
    position: [f64; D],
    total_weight: f64,
    origin: [f64; D],
}

impl<const D: usize> IncrementalBarycenter<D> {
    /// Creates an empty accumulator reporting `origin` until weight arrives.
    pub fn new(origin: [f64; D]) -> Self {
        Self { position: origin, total_weight: 0.0, origin }
    }

    pub fn position(&self) -> &[f64; D] {
        &self.position
    }

    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    pub fn origin(&self) -> &[f64; D] {
        &self.origin
    }

    pub fn is_empty(&self) -> bool {
        self.total_weight == 0.0
    }

    /// Folds one weighted position into the running mean.
    ///
    /// A negative `weight` removes a previously added contribution. Callers
    /// must never drive the total weight below zero; if the total reaches zero
    /// the accumulator falls back to its origin instead of dividing by zero.
    pub fn update(&mut self, position: &[f64; D], weight: f64) {
        if weight == 0.0 {
            return;
        }
        let new_total = self.total_weight + weight;
        debug_assert!(
            new_total > -f64::EPSILON * weight.abs().max(self.total_weight.abs()),
            "barycenter weight went negative: {} + {}",
            self.total_weight,
            weight
        );
        // Cancellation down to rounding noise counts as empty.
        if new_total <= f64::EPSILON * weight.abs().max(self.total_weight.abs()) {
            self.reset();
            return;
        }
        for d in 0..D {
            self.position[d] = (self.position[d] * self.total_weight + position[d] * weight) / new_total;
        }
        self.total_weight = new_total;
    }

    /// Folds another accumulator in, weighted by its total weight.
    pub fn merge(&mut self, other: &Self) {
        self.update(&other.position, other.total_weight);
    }

    /// Drops all accumulated weight.
    pub fn reset(&mut self) {
        self.position = self.origin;
        self.total_weight = 0.0;
    }
}

impl<const D: usize> AbsDiffEq for IncrementalBarycenter<D> {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.total_weight.abs_diff_eq(&other.total_weight, epsilon)
            && self.position.iter()
                .zip(other.position.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<const D: usize> RelativeEq for IncrementalBarycenter<D> {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.total_weight.relative_eq(&other.total_weight, epsilon, max_relative)
            && self.position.iter()
                .zip(other.position.iter())
                .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

use crate::utils;

/// Hard bound on subdivision depth. Halving a unit-scale region fifty times
/// already approaches the spacing of adjacent `f64` values.
pub const MAX_DEPTH: usize = 50;

/// Squared distances at or below `ZERO_DISTANCE_EPSILON²` count as coincident.
pub const ZERO_DISTANCE_EPSILON: f64 = 1e-12;

pub const DEFAULT_TREE_CONFIG: utils::TreeConfig = utils::TreeConfig {
    capacity: 8,
    max_depth: MAX_DEPTH,
    theta: 0.5,
    neighbor_limit: None,
    domain_padding: 1e-6,
};

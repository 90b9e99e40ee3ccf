// src/utils/tree_config.rs
use crate::utils::{
    DEFAULT_TREE_CONFIG,
    errors::TreeError
};

/// Knobs consumed from the surrounding simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeConfig {
    /// Elements a leaf holds before it splits into 2^D children.
    pub capacity: usize,
    /// Depth at which leaves stop splitting and spill into their overflow list.
    pub max_depth: usize,
    /// Barnes-Hut opening angle: a subtree is one aggregate when `size / distance < theta`.
    pub theta: f64,
    /// Default cap on the number of neighbors a neighbor query yields.
    pub neighbor_limit: Option<usize>,
    /// Padding added around element extents when the domain is computed for the caller.
    pub domain_padding: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        DEFAULT_TREE_CONFIG
    }
}

impl TreeConfig {
    pub fn new(
        capacity: Option<usize>,
        max_depth: Option<usize>,
        theta: Option<f64>,
        neighbor_limit: Option<usize>,
        domain_padding: Option<f64>,
    ) -> Self {
        let default = DEFAULT_TREE_CONFIG;
        Self {
            capacity: capacity.unwrap_or(default.capacity),
            max_depth: max_depth.unwrap_or(default.max_depth),
            theta: theta.unwrap_or(default.theta),
            neighbor_limit: neighbor_limit.or(default.neighbor_limit),
            domain_padding: domain_padding.unwrap_or(default.domain_padding),
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    pub fn with_neighbor_limit(mut self, neighbor_limit: Option<usize>) -> Self {
        self.neighbor_limit = neighbor_limit;
        self
    }

    pub fn validate(&self) -> Result<(), TreeError> {
        if self.capacity == 0 { return Err(TreeError::InvalidCapacity); }
        if !self.theta.is_finite() || self.theta < 0.0 { return Err(TreeError::InvalidTheta); }
        if !self.domain_padding.is_finite() || self.domain_padding < 0.0 { return Err(TreeError::InvalidPadding); }
        Ok(())
    }
}

mod element;
mod node;
#[allow(clippy::module_inception)]
mod tree;

pub use element::*;
pub use node::{NodeId, NodeKind, SpatialNode};
pub use tree::*;

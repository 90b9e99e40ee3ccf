//! Adaptive n-dimensional orthtree for particle simulations.
//!
//! The tree is rebuilt from scratch every simulation tick: the caller sizes a
//! root [`geometry::BoundingRegion`], bulk-inserts its elements, and then
//! queries the frozen [`tree::Tree`] from any number of threads. Two read
//! algorithms are provided:
//!
//! * [`queries::NeighborQuery`], an upward-expanding, approximately
//!   nearest-first neighbor walk for local interaction rules (flocking);
//! * [`queries::FarFieldQuery`], a Barnes-Hut traversal splitting the domain
//!   into exact near-field elements and far-field barycenter aggregates
//!   (gravity, electrostatics).
pub mod utils;
pub mod geometry;
pub mod aggregation;
pub mod tree;
pub mod queries;
#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(feature = "neighbor-query")]
mod neighbor_query;
#[cfg(feature = "far-field")]
mod far_field_query;

#[cfg(feature = "neighbor-query")]
pub use neighbor_query::*;
#[cfg(feature = "far-field")]
pub use far_field_query::*;

#[cfg(test)]
#[cfg(feature = "neighbor-query")]
mod neighbor_query_tests;

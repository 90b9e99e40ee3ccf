mod bounding_region;

pub use bounding_region::*;

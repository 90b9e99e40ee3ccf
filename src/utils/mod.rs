mod constants;
mod tree_config;
mod math_helpers;
pub mod errors;

pub use constants::*;
pub use tree_config::*;
pub use math_helpers::*;
pub use errors::TreeError;

#[cfg(test)]
mod math_helpers_tests;

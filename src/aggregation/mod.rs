mod barycenter;
mod channel;

pub use barycenter::*;
pub use channel::*;

#[cfg(test)]
mod barycenter_tests;

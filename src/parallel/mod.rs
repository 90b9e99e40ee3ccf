mod read_phase;

pub use read_phase::*;

#[cfg(test)]
mod read_phase_tests;

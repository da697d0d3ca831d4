//! Integration test crate for Courtside.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple courtside crates to verify they work together.

#[cfg(test)]
mod fixtures;

#[cfg(test)]
mod match_pipeline;

#[cfg(test)]
mod detection_file;

//! Content store backends.

pub mod github;
pub mod memory;

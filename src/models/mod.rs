//! Growth-model catalogue.
//!
//! Models are plain values with pure evaluation functions so that the
//! fitting code can stay generic over them.

pub mod model;

pub use model::*;

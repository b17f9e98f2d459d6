//! Scalability testing: time a work function over growing inputs and
//! classify how its cost grows.

pub mod control;
pub mod ladder;
pub mod sweep;

pub use control::*;
pub use ladder::*;
pub use sweep::*;

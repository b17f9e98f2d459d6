//! Measurement primitives: tasks, runners, and the statistics they produce.

pub mod order;
pub mod runner;
pub mod stats;
pub mod task;
pub mod timer;

pub use order::*;
pub use runner::*;
pub use stats::*;
pub use task::*;
pub use timer::{black_box, measure_tick};

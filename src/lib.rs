//! `ubench` library crate.
//!
//! An adaptive micro-benchmark harness:
//!
//! - register tasks in a [`Bench`] and `press` them under a sequential,
//!   interleaved, or parallel schedule
//! - summarize each task's timings as [`UStats`]
//! - sweep a work function over growing input sizes with [`run_scale`] and
//!   fit growth models to the result with [`detect_growth`]
//!
//! The crate emits `tracing` events but never installs a subscriber.

pub mod bench;
pub mod domain;
pub mod error;
pub mod exec;
pub mod fit;
pub mod math;
pub mod models;
pub mod scale;
pub mod suite;

pub use bench::{StatsOrder, Task, UStats, black_box, sort_stats};
pub use domain::{ExecMode, ParallelOptions, PressConfig, SweepConfig, TimeUnit};
pub use error::BenchError;
pub use fit::{MathEquation, best_fit, fit_model, rank_models};
pub use models::MathModel;
pub use scale::{ScaleControl, ScaleResult, ScaleSweep, detect_growth, rank_growth, run_scale};
pub use suite::Bench;

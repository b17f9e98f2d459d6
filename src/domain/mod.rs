//! Domain types used throughout the harness.
//!
//! This module defines:
//!
//! - scheduling and display enums (`ExecMode`, `TimeUnit`)
//! - run configuration (`PressConfig`, `SweepConfig`) and its environment overrides

pub mod env;
pub mod types;

pub use types::*;

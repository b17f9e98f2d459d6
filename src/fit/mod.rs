//! Growth-curve fitting.
//!
//! Responsibilities:
//!
//! - fit a single model by Newton-Raphson least squares (`fitter`)
//! - fit the whole catalogue in parallel and rank the results (`selection`)

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;

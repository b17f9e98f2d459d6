//! Numerical building blocks for growth-curve fitting.

pub mod basis;
pub mod newton;
pub mod qr;

pub use basis::*;
pub use newton::{NewtonSolution, solve};
pub use qr::*;

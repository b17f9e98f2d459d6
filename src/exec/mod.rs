//! Execution strategies.
//!
//! Every strategy takes the runners of one batch and returns one `UStats`
//! per runner, in input order. The first task failure fails the batch.

pub mod interleaved;
pub mod parallel;
pub mod sequential;

use crate::bench::{TaskRunner, UStats};
use crate::domain::{ExecMode, ParallelOptions};
use crate::error::BenchError;

/// Drive `runners` to completion under `mode`.
pub fn execute(
    mode: ExecMode,
    suite: &str,
    runners: Vec<TaskRunner>,
    options: &ParallelOptions,
) -> Result<Vec<UStats>, BenchError> {
    tracing::debug!(suite, mode = mode.display_name(), tasks = runners.len(), "executing batch");
    match mode {
        ExecMode::Sequential => sequential::execute(suite, runners),
        ExecMode::Interleaved => interleaved::execute(suite, runners),
        ExecMode::Parallel => parallel::execute(suite, runners, options),
    }
}

//! Run every task to completion before starting the next.

use crate::bench::{TaskRunner, UStats};
use crate::error::BenchError;

pub fn execute(suite: &str, runners: Vec<TaskRunner>) -> Result<Vec<UStats>, BenchError> {
    let mut out = Vec::with_capacity(runners.len());
    for mut runner in runners {
        runner.run_to_completion()?;
        out.push(runner.collect(suite));
    }
    Ok(out)
}

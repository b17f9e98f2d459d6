//! Round-robin: one step of every unfinished task per pass.

use crate::bench::{TaskRunner, UStats};
use crate::error::BenchError;

pub fn execute(suite: &str, mut runners: Vec<TaskRunner>) -> Result<Vec<UStats>, BenchError> {
    let mut pending = runners.len();
    while pending > 0 {
        for runner in runners.iter_mut().filter(|r| !r.is_complete()) {
            if runner.step()? {
                pending -= 1;
            }
        }
    }
    Ok(runners.into_iter().map(|r| r.collect(suite)).collect())
}

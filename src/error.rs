use std::time::Duration;

use thiserror::Error;

/// Failures surfaced by the benchmark harness.
///
/// Numerical trouble during curve fitting and a full result buffer are not
/// errors: a degenerate fit is reported as an invalid equation and a full
/// buffer simply completes the runner.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BenchError {
    #[error("Task {task} failed validation. Result: {result}")]
    Validation { task: String, result: String },

    #[error("Task {task} failed: {message}")]
    Execution { task: String, message: String },

    #[error("Unable to cleanly shut down the parallel execution within {grace:?}")]
    ShutdownTimeout { grace: Duration },

    #[error("Unable to build the parallel worker pool: {0}")]
    WorkerPool(String),

    #[error("A task named {0:?} is already registered")]
    DuplicateTask(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Scale and timing samples differ in length: {scales} scales, {timings} timings")]
    SampleMismatch { scales: usize, timings: usize },

    #[error("No samples to fit")]
    NoSamples,
}

impl BenchError {
    /// Name of the task that caused the failure, when there is one.
    pub fn task(&self) -> Option<&str> {
        match self {
            BenchError::Validation { task, .. } | BenchError::Execution { task, .. } => Some(task),
            BenchError::DuplicateTask(name) => Some(name),
            _ => None,
        }
    }
}

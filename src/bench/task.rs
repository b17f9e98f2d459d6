//! Measurable units of work.
//!
//! A [`Task`] is anything that can run once and report how long it took.
//! Closures of the right shape are tasks already, which keeps synthetic
//! tasks (fixed durations, scripted failures) trivial to write in tests.
//! The builders here wrap ordinary user code: they time only the body and
//! run any result check outside the timed region.

use std::fmt::{Debug, Display};
use std::sync::Arc;

use crate::bench::timer::time_call;
use crate::error::BenchError;

/// A single measurable unit of work.
pub trait Task: Send + Sync {
    /// Run the work once, returning the elapsed nanoseconds.
    fn measure(&self) -> Result<u64, BenchError>;
}

impl<F> Task for F
where
    F: Fn() -> Result<u64, BenchError> + Send + Sync,
{
    fn measure(&self) -> Result<u64, BenchError> {
        self()
    }
}

/// Shared handle to a task; runners for the same task may coexist.
pub type SharedTask = Arc<dyn Task>;

/// Time `body` on every invocation.
pub fn timed<T, F>(body: F) -> SharedTask
where
    F: Fn() -> T + Send + Sync + 'static,
{
    Arc::new(move || {
        let (_, nanos) = time_call(&body);
        Ok(nanos)
    })
}

/// Time `body`, then fail with a validation error if `check` rejects its result.
pub fn checked<T, F, C>(name: impl Into<String>, body: F, check: C) -> SharedTask
where
    T: Debug,
    F: Fn() -> T + Send + Sync + 'static,
    C: Fn(&T) -> bool + Send + Sync + 'static,
{
    let name = name.into();
    Arc::new(move || {
        let (value, nanos) = time_call(&body);
        if !check(&value) {
            return Err(BenchError::Validation {
                task: name.clone(),
                result: format!("{value:?}"),
            });
        }
        Ok(nanos)
    })
}

/// Time a body that can fail; its error aborts the batch.
pub fn fallible<T, E, F>(name: impl Into<String>, body: F) -> SharedTask
where
    E: Display,
    F: Fn() -> Result<T, E> + Send + Sync + 'static,
{
    let name = name.into();
    Arc::new(move || {
        let (outcome, nanos) = time_call(&body);
        match outcome {
            Ok(_) => Ok(nanos),
            Err(e) => Err(BenchError::Execution {
                task: name.clone(),
                message: e.to_string(),
            }),
        }
    })
}

//! One dedicated worker thread per task, all running at once.
//!
//! Workers share only an abort flag and a result channel. Results are
//! tagged with the runner's position so the output order matches the input
//! order regardless of which worker finishes first.
//!
//! When a worker fails, the flag is raised and the remaining workers stop
//! at their next check. They check once every `abort_check_interval`
//! iterations rather than every iteration. The batch then has
//! `shutdown_grace` to drain; if it does not, that is itself a failure.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Instant;

use crate::bench::{TaskRunner, UStats};
use crate::domain::ParallelOptions;
use crate::error::BenchError;

/// What a worker reports back: stats, nothing (aborted), or its failure.
type WorkerOutcome = Result<Option<UStats>, BenchError>;

pub fn execute(
    suite: &str,
    runners: Vec<TaskRunner>,
    options: &ParallelOptions,
) -> Result<Vec<UStats>, BenchError> {
    options.validate()?;
    let count = runners.len();
    if count == 0 {
        return Ok(Vec::new());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(count)
        .thread_name(|i| format!("ubench-parallel-{i}"))
        .build()
        .map_err(|e| BenchError::WorkerPool(e.to_string()))?;

    let abort = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel::<(usize, WorkerOutcome)>();

    for (slot, runner) in runners.into_iter().enumerate() {
        let tx = tx.clone();
        let abort = Arc::clone(&abort);
        let suite = suite.to_string();
        let interval = options.abort_check_interval;
        pool.spawn(move || {
            let name = runner.name().to_string();
            let run = AssertUnwindSafe(|| drive(runner, &suite, &abort, interval));
            let outcome = panic::catch_unwind(run).unwrap_or_else(|payload| {
                Err(BenchError::Execution {
                    task: name,
                    message: panic_message(payload.as_ref()),
                })
            });
            // The receiver is gone only if the batch already gave up on us.
            let _ = tx.send((slot, outcome));
        });
    }
    drop(tx);

    let mut slots: Vec<Option<UStats>> = (0..count).map(|_| None).collect();
    let mut failure: Option<(BenchError, Instant)> = None;

    for _ in 0..count {
        let received = match &failure {
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
            Some((_, deadline)) => {
                rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
        };
        match received {
            Ok((slot, Ok(stats))) => slots[slot] = stats,
            Ok((_, Err(err))) => {
                if failure.is_none() {
                    tracing::warn!(suite, error = %err, "parallel batch aborting");
                    abort.store(true, Ordering::Relaxed);
                    failure = Some((err, Instant::now() + options.shutdown_grace));
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                return Err(BenchError::ShutdownTimeout {
                    grace: options.shutdown_grace,
                });
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    if let Some((err, _)) = failure {
        return Err(err);
    }

    slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| {
            BenchError::WorkerPool("a parallel worker exited without reporting".to_string())
        })
}

fn drive(
    mut runner: TaskRunner,
    suite: &str,
    abort: &AtomicBool,
    interval: usize,
) -> WorkerOutcome {
    let mut loops = 0usize;
    loop {
        loops += 1;
        if loops % interval == 0 && abort.load(Ordering::Relaxed) {
            return Ok(None);
        }
        if runner.step()? {
            return Ok(Some(runner.collect(suite)));
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

//! In-flight state for repeated measurement of one task.
//!
//! A runner is driven one step at a time so that execution strategies can
//! decide how steps of different tasks are scheduled. Each step performs at
//! most one measurement; the runner completes when it hits its iteration
//! cap, exhausts its time budget, finds a plateau, or runs out of room.

use std::time::Duration;

use crate::bench::stats::UStats;
use crate::bench::task::SharedTask;
use crate::domain::{MAX_RESULTS, PressConfig};
use crate::error::BenchError;

/// Initial buffer allocation, before any growth.
const INITIAL_CAPACITY: usize = 10_000;
/// Minimum number of slots added when the buffer fills.
const MIN_GROWTH: usize = 100;

/// Limits that decide when a runner stops.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunnerLimits {
    /// Iteration cap (already clamped to `MAX_RESULTS`).
    pub iterations: usize,
    /// Plateau window length; `0` disables plateau detection.
    pub stability_span: usize,
    /// Ratio bound for a stable window, e.g. `1.10` for 10%.
    pub stability_factor: f64,
    pub time_limit: Option<Duration>,
}

impl RunnerLimits {
    pub fn from_config(config: &PressConfig) -> Self {
        Self {
            iterations: config.effective_iterations(),
            stability_span: config.effective_span(),
            stability_factor: config.stability_factor(),
            time_limit: config.time_limit,
        }
    }

    pub fn iterations(iterations: usize) -> Self {
        Self {
            iterations: iterations.clamp(1, MAX_RESULTS),
            stability_span: 0,
            stability_factor: 1.0,
            time_limit: None,
        }
    }
}

/// Size the buffer grows to once `length` slots are full, or `None` at the cap.
///
/// Grows by 25% plus `MIN_GROWTH`, never past `cap`.
pub(crate) fn expand_to(length: usize, cap: usize) -> Option<usize> {
    let add = (MIN_GROWTH + (length >> 2)).min(cap.saturating_sub(length));
    (add > 0).then_some(length + add)
}

/// True when every value in `window` lies within `factor` of the window minimum.
fn in_bounds(window: &[u64], factor: f64) -> bool {
    let Some(&min) = window.iter().min() else {
        return false;
    };
    let max = window.iter().copied().max().unwrap_or(min);
    max as f64 <= min as f64 * factor
}

pub struct TaskRunner {
    name: String,
    index: usize,
    task: SharedTask,
    results: Vec<u64>,
    /// Slots granted so far; the buffer never holds more than this.
    allotted: usize,
    stable: Vec<u64>,
    stability_factor: f64,
    limit: usize,
    /// Most results the buffer may ever hold.
    cap: usize,
    remaining: Option<u64>,
    complete: bool,
}

impl std::fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRunner")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("iterations", &self.results.len())
            .field("complete", &self.complete)
            .finish()
    }
}

impl TaskRunner {
    pub fn new(
        name: impl Into<String>,
        task: SharedTask,
        index: usize,
        limits: RunnerLimits,
    ) -> Self {
        let limit = match limits.iterations {
            0 => MAX_RESULTS,
            n => n.min(MAX_RESULTS),
        };
        let allotted = limit.min(INITIAL_CAPACITY);
        let remaining = limits
            .time_limit
            .filter(|t| !t.is_zero())
            .map(|t| u64::try_from(t.as_nanos()).unwrap_or(u64::MAX));
        Self {
            name: name.into(),
            index,
            task,
            results: Vec::with_capacity(allotted),
            allotted,
            stable: vec![0; limits.stability_span.min(limit)],
            stability_factor: limits.stability_factor,
            limit,
            cap: MAX_RESULTS,
            remaining,
            complete: false,
        }
    }

    /// Lower the buffer cap below `MAX_RESULTS`.
    #[cfg(test)]
    pub(crate) fn with_result_cap(mut self, cap: usize) -> Self {
        self.cap = cap.clamp(1, MAX_RESULTS);
        self.allotted = self.allotted.min(self.cap);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn iterations(&self) -> usize {
        self.results.len()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Perform one more measurement.
    ///
    /// Returns `Ok(true)` once the runner is complete; a complete runner
    /// never measures again. Task failures propagate unchanged.
    pub fn step(&mut self) -> Result<bool, BenchError> {
        if self.complete {
            return Ok(true);
        }

        if self.results.len() >= self.allotted {
            match expand_to(self.allotted, self.cap) {
                Some(len) => {
                    self.results.reserve_exact(len - self.results.len());
                    self.allotted = len;
                }
                None => {
                    self.complete = true;
                    return Ok(true);
                }
            }
        }

        let nanos = self.task.measure()?.max(1);
        let seen = self.results.len();
        self.results.push(nanos);

        if !self.stable.is_empty() {
            let span = self.stable.len();
            self.stable[seen % span] = nanos;
            if seen + 1 > span && in_bounds(&self.stable, self.stability_factor) {
                self.complete = true;
            }
        }

        if let Some(remaining) = self.remaining {
            match remaining.checked_sub(nanos) {
                Some(left) => self.remaining = Some(left),
                None => {
                    self.remaining = Some(0);
                    self.complete = true;
                }
            }
        }

        if self.results.len() >= self.limit {
            self.complete = true;
        }
        Ok(self.complete)
    }

    /// Step until complete.
    pub fn run_to_completion(&mut self) -> Result<(), BenchError> {
        while !self.step()? {}
        Ok(())
    }

    /// Summarize everything collected so far.
    pub fn collect(self, suite: &str) -> UStats {
        UStats::new(suite, self.name, self.index, self.results)
    }
}

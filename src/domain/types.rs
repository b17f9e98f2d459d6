//! Shared domain types.
//!
//! This module defines:
//!
//! - the scheduling discipline used to drive a batch (`ExecMode`)
//! - display units for nanosecond timings (`TimeUnit`)
//! - run configuration (`PressConfig`, `SweepConfig`, `ParallelOptions`)
//!
//! The configuration types are serializable so a caller can persist or load
//! them alongside exported results.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::BenchError;

/// Hard cap on the number of measurements a single runner may collect.
pub const MAX_RESULTS: usize = 1_000_000_000;

/// How the runners of one batch are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    /// Run every iteration of one task before starting the next.
    ///
    /// ```text
    /// A1 A2 .. An
    ///             B1 B2 .. Bn
    /// ```
    Sequential,
    /// One dedicated thread per task, all running at once.
    Parallel,
    /// One iteration of each unfinished task per round.
    ///
    /// ```text
    /// A1    A2    ..    An
    ///    B1    B2    ..    Bn
    /// ```
    #[default]
    Interleaved,
}

impl ExecMode {
    pub const ALL: [ExecMode; 3] = [
        ExecMode::Sequential,
        ExecMode::Parallel,
        ExecMode::Interleaved,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ExecMode::Sequential => "Sequential",
            ExecMode::Parallel => "Parallel",
            ExecMode::Interleaved => "Interleaved",
        }
    }
}

/// Unit used to present nanosecond timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    /// All units, smallest first.
    pub const ALL: [TimeUnit; 7] = [
        TimeUnit::Nanoseconds,
        TimeUnit::Microseconds,
        TimeUnit::Milliseconds,
        TimeUnit::Seconds,
        TimeUnit::Minutes,
        TimeUnit::Hours,
        TimeUnit::Days,
    ];

    /// Length of one unit in nanoseconds.
    pub fn nanos(self) -> u64 {
        match self {
            TimeUnit::Nanoseconds => 1,
            TimeUnit::Microseconds => 1_000,
            TimeUnit::Milliseconds => 1_000_000,
            TimeUnit::Seconds => 1_000_000_000,
            TimeUnit::Minutes => 60 * 1_000_000_000,
            TimeUnit::Hours => 3_600 * 1_000_000_000,
            TimeUnit::Days => 86_400 * 1_000_000_000,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "min",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }

    /// Express `nanos` in this unit.
    pub fn convert(self, nanos: u64) -> f64 {
        nanos as f64 / self.nanos() as f64
    }

    /// Pick a convenient unit for displaying `nanos`.
    ///
    /// The chosen unit is the largest one whose tenth is still no more than
    /// the value, so the number shows as at least `0.1` without a long tail
    /// of integer digits: 5432ns reads as `5.432us`, 8954228ns as
    /// `8.954ms`. Find the unit for the shortest time in a data set and use
    /// it for every value in that set.
    pub fn best_for(nanos: u64) -> TimeUnit {
        for pair in TimeUnit::ALL.windows(2) {
            if pair[1].nanos() / 10 > nanos {
                return pair[0];
            }
        }
        TimeUnit::Days
    }
}

/// Cooperative-cancellation settings for parallel execution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParallelOptions {
    /// Workers check the shared abort flag once every this many iterations.
    pub abort_check_interval: usize,
    /// How long an aborted batch may take to drain before it is a failure.
    pub shutdown_grace: Duration,
}

impl Default for ParallelOptions {
    fn default() -> Self {
        Self {
            abort_check_interval: 1_000,
            shutdown_grace: Duration::from_secs(1),
        }
    }
}

impl ParallelOptions {
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.abort_check_interval == 0 {
            return Err(BenchError::InvalidConfig(
                "abort_check_interval must be > 0.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for one `press` of a benchmark suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressConfig {
    /// Iteration cap per task; `0` means only the hard cap applies.
    pub max_iterations: usize,
    /// Length of the plateau window; `0` disables plateau detection.
    pub stability_span: usize,
    /// A window is stable when its slowest run is within this many percent
    /// of its fastest.
    pub stability_bound_percent: f64,
    /// Per-task time budget.
    pub time_limit: Option<Duration>,
    pub parallel: ParallelOptions,
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            stability_span: 0,
            stability_bound_percent: 0.0,
            time_limit: None,
            parallel: ParallelOptions::default(),
        }
    }
}

impl PressConfig {
    /// Run at most `iterations` times per task.
    pub fn iterations(iterations: usize) -> Self {
        Self {
            max_iterations: iterations,
            ..Self::default()
        }
    }

    /// Run each task until its time budget is spent.
    pub fn timed(limit: Duration) -> Self {
        Self {
            max_iterations: 0,
            time_limit: Some(limit),
            ..Self::default()
        }
    }

    /// Stop a task once `span` consecutive runs stay within `bound_percent`.
    pub fn with_stability(mut self, span: usize, bound_percent: f64) -> Self {
        self.stability_span = span;
        self.stability_bound_percent = bound_percent;
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<(), BenchError> {
        if !(self.stability_bound_percent.is_finite() && self.stability_bound_percent >= 0.0) {
            return Err(BenchError::InvalidConfig(format!(
                "stability_bound_percent must be finite and >= 0, got {}.",
                self.stability_bound_percent
            )));
        }
        self.parallel.validate()
    }

    /// Iteration cap after applying the hard limit.
    pub fn effective_iterations(&self) -> usize {
        match self.max_iterations {
            0 => MAX_RESULTS,
            n => n.min(MAX_RESULTS),
        }
    }

    /// Plateau window length, or `0` when plateau detection is off.
    pub fn effective_span(&self) -> usize {
        if self.stability_span == 0 || self.stability_bound_percent <= 0.0 {
            0
        } else {
            self.stability_span.min(self.effective_iterations())
        }
    }

    /// Ratio form of the stability bound (`10%` becomes `1.10`).
    pub fn stability_factor(&self) -> f64 {
        1.0 + self.stability_bound_percent / 100.0
    }
}

/// Settings for a scalability sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Largest scale the doubling ladder may reach.
    pub scale_limit: usize,
    /// Iteration cap for each scale point.
    pub max_iterations: usize,
    /// Time budget for each scale point.
    pub time_limit: Duration,
    /// The sweep halts once a point collects this many samples or fewer.
    pub min_samples: usize,
    /// Backfill extra points only when the ladder produced at least this many.
    pub backfill_threshold: usize,
    /// Run a short parallel warm-up pass at scale 2 before the sweep.
    pub warmup: bool,
    pub parallel: ParallelOptions,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            scale_limit: 12_000_000,
            max_iterations: 1_000_000,
            time_limit: Duration::from_secs(1),
            min_samples: 3,
            backfill_threshold: 5,
            warmup: true,
            parallel: ParallelOptions::default(),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.scale_limit == 0 {
            return Err(BenchError::InvalidConfig("scale_limit must be > 0.".to_string()));
        }
        if self.max_iterations == 0 {
            return Err(BenchError::InvalidConfig("max_iterations must be > 0.".to_string()));
        }
        if self.time_limit.is_zero() {
            return Err(BenchError::InvalidConfig("time_limit must be > 0.".to_string()));
        }
        self.parallel.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_unit_examples() {
        assert_eq!(TimeUnit::best_for(0), TimeUnit::Nanoseconds);
        assert_eq!(TimeUnit::best_for(99), TimeUnit::Nanoseconds);
        assert_eq!(TimeUnit::best_for(100), TimeUnit::Microseconds);
        assert_eq!(TimeUnit::best_for(5_432), TimeUnit::Microseconds);
        assert_eq!(TimeUnit::best_for(8_954_228), TimeUnit::Milliseconds);
        assert_eq!(TimeUnit::best_for(u64::MAX), TimeUnit::Days);
    }

    #[test]
    fn span_is_disabled_without_a_bound() {
        let config = PressConfig::iterations(100).with_stability(5, 0.0);
        assert_eq!(config.effective_span(), 0);

        let config = PressConfig::iterations(3).with_stability(5, 1.0);
        assert_eq!(config.effective_span(), 3);
        assert!((config.stability_factor() - 1.01).abs() < 1e-12);
    }

    #[test]
    fn iterations_are_capped() {
        assert_eq!(PressConfig::iterations(0).effective_iterations(), MAX_RESULTS);
        assert_eq!(PressConfig::iterations(usize::MAX).effective_iterations(), MAX_RESULTS);
    }

    #[test]
    fn negative_bound_is_rejected() {
        let config = PressConfig::iterations(10).with_stability(5, -1.0);
        assert!(matches!(config.validate(), Err(BenchError::InvalidConfig(_))));
    }
}

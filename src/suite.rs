//! Named benchmark suite.
//!
//! A [`Bench`] keeps its tasks in registration order. Each `press` turns
//! every task into a fresh runner, hands the batch to an execution strategy,
//! and returns one [`UStats`] per task in registration order. Use
//! [`sort_stats`](crate::bench::sort_stats) to reorder the result.

use std::fmt::{Debug, Display};

use crate::bench::{RunnerLimits, SharedTask, TaskRunner, UStats, checked, fallible, timed};
use crate::domain::{ExecMode, PressConfig};
use crate::error::BenchError;

pub struct Bench {
    suite: String,
    tasks: Vec<(String, SharedTask)>,
}

impl std::fmt::Debug for Bench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bench")
            .field("suite", &self.suite)
            .field("tasks", &self.task_names())
            .finish()
    }
}

impl Bench {
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            tasks: Vec::new(),
        }
    }

    pub fn suite_name(&self) -> &str {
        &self.suite
    }

    /// Registered task names, in registration order.
    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Register a task that is timed and never checked.
    pub fn add_task<T, F>(&mut self, name: impl Into<String>, body: F) -> Result<(), BenchError>
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.add_raw_task(name, timed(body))
    }

    /// Register a task whose every result must satisfy `check`.
    ///
    /// The check runs outside the timed region. A rejected result fails the
    /// whole press with [`BenchError::Validation`].
    pub fn add_checked_task<T, F, C>(
        &mut self,
        name: impl Into<String>,
        body: F,
        check: C,
    ) -> Result<(), BenchError>
    where
        T: Debug,
        F: Fn() -> T + Send + Sync + 'static,
        C: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        self.ensure_unique(&name)?;
        let task = checked(name.clone(), body, check);
        self.tasks.push((name, task));
        Ok(())
    }

    /// Register a task whose body reports its own failures.
    pub fn add_fallible_task<T, E, F>(
        &mut self,
        name: impl Into<String>,
        body: F,
    ) -> Result<(), BenchError>
    where
        E: Display,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
    {
        let name = name.into();
        self.ensure_unique(&name)?;
        let task = fallible(name.clone(), body);
        self.tasks.push((name, task));
        Ok(())
    }

    /// Register a pre-built task that does its own timing.
    pub fn add_raw_task(
        &mut self,
        name: impl Into<String>,
        task: SharedTask,
    ) -> Result<(), BenchError> {
        let name = name.into();
        self.ensure_unique(&name)?;
        self.tasks.push((name, task));
        Ok(())
    }

    fn ensure_unique(&self, name: &str) -> Result<(), BenchError> {
        if self.tasks.iter().any(|(existing, _)| existing == name) {
            return Err(BenchError::DuplicateTask(name.to_string()));
        }
        Ok(())
    }

    /// Benchmark every registered task under `mode`.
    pub fn press(&self, mode: ExecMode, config: &PressConfig) -> Result<Vec<UStats>, BenchError> {
        config.validate()?;
        if self.tasks.is_empty() {
            return Ok(Vec::new());
        }

        let limits = RunnerLimits::from_config(config);
        let runners = self
            .tasks
            .iter()
            .enumerate()
            .map(|(index, (name, task))| {
                TaskRunner::new(name.clone(), SharedTask::clone(task), index, limits)
            })
            .collect();

        tracing::debug!(
            suite = %self.suite,
            mode = mode.display_name(),
            iterations = limits.iterations,
            span = limits.stability_span,
            "press started"
        );
        let stats = crate::exec::execute(mode, &self.suite, runners, &config.parallel)?;
        tracing::debug!(suite = %self.suite, tasks = stats.len(), "press finished");
        Ok(stats)
    }

    /// `press` with the default (interleaved) mode.
    pub fn press_default(&self, config: &PressConfig) -> Result<Vec<UStats>, BenchError> {
        self.press(ExecMode::default(), config)
    }
}

//! Per-scale input data and the tasks that time work against it.
//!
//! With `reuse` set, the generator runs once per scale and the result is
//! cached read-only; every invocation borrows the cached value. Without it,
//! every invocation gets freshly generated data, produced outside the timed
//! region.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::bench::timer::{black_box, time_call};
use crate::bench::{RunnerLimits, SharedTask, TaskRunner};
use crate::domain::SweepConfig;
use crate::error::BenchError;

type Work<T> = Arc<dyn Fn(&T) + Send + Sync>;
type Generator<T> = Arc<dyn Fn(usize) -> T + Send + Sync>;

pub struct ScaleControl<T> {
    work: Work<T>,
    generator: Generator<T>,
    reuse: bool,
    cache: Mutex<HashMap<usize, Arc<T>>>,
}

impl<T> std::fmt::Debug for ScaleControl<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaleControl")
            .field("reuse", &self.reuse)
            .field("cached_scales", &self.cached_scales())
            .finish()
    }
}

impl<T> ScaleControl<T> {
    pub fn reuses_data(&self) -> bool {
        self.reuse
    }

    /// Scales whose shared input has been generated, ascending.
    pub fn cached_scales(&self) -> Vec<usize> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let mut scales: Vec<usize> = cache.keys().copied().collect();
        scales.sort_unstable();
        scales
    }
}

impl<T> ScaleControl<T>
where
    T: Send + Sync + 'static,
{
    pub fn new<R, W, G>(work: W, generator: G, reuse: bool) -> Self
    where
        W: Fn(&T) -> R + Send + Sync + 'static,
        G: Fn(usize) -> T + Send + Sync + 'static,
    {
        Self {
            work: Arc::new(move |data: &T| {
                black_box(work(data));
            }),
            generator: Arc::new(generator),
            reuse,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Shared input for `scale`, generated on first request.
    fn shared_data(&self, scale: usize) -> Arc<T> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            cache
                .entry(scale)
                .or_insert_with(|| Arc::new((self.generator)(scale))),
        )
    }

    /// A task that times one run of the work against `scale`-sized input.
    pub fn build_task(&self, scale: usize) -> SharedTask {
        let work = Arc::clone(&self.work);
        if self.reuse {
            let data = self.shared_data(scale);
            Arc::new(move || -> Result<u64, BenchError> {
                let (_, nanos) = time_call(|| work(&data));
                Ok(nanos)
            })
        } else {
            let generator = Arc::clone(&self.generator);
            Arc::new(move || -> Result<u64, BenchError> {
                let input = generator(scale);
                let (_, nanos) = time_call(|| work(&input));
                Ok(nanos)
            })
        }
    }

    /// A runner for `scale` bounded by the sweep's per-point limits.
    ///
    /// The runner's index is the scale itself.
    pub fn build_runner(
        &self,
        name: impl Into<String>,
        scale: usize,
        config: &SweepConfig,
    ) -> TaskRunner {
        let limits = RunnerLimits {
            iterations: config.max_iterations,
            stability_span: 0,
            stability_factor: 1.0,
            time_limit: Some(config.time_limit),
        };
        TaskRunner::new(name, self.build_task(scale), scale, limits)
    }
}

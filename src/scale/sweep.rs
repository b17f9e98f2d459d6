//! Scalability sweep.
//!
//! The sweep measures one work function at increasing scales:
//!
//! 1. a short parallel warm-up at scale 2
//! 2. a doubling ladder (1, 2, 4, …), one sequential pass per scale, that
//!    stops once a point collects `min_samples` runs or fewer within its
//!    time budget
//! 3. if the ladder produced at least `backfill_threshold` points, extra
//!    points between `last / 8` and `last`
//!
//! Each point's representative time is its average. The growth model is
//! then fitted to `(scale, average)` pairs.

use serde::Serialize;

use crate::bench::{UStats, measure_tick};
use crate::domain::{ExecMode, SweepConfig};
use crate::error::BenchError;
use crate::fit::{MathEquation, best_fit, rank_catalogue};
use crate::scale::control::ScaleControl;
use crate::scale::ladder::{backfill_scales, doubling_scales};

/// Statistics for one scale point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleResult {
    scale: usize,
    stats: UStats,
}

impl ScaleResult {
    pub fn new(scale: usize, stats: UStats) -> Self {
        Self { scale, stats }
    }

    pub fn scale(&self) -> usize {
        self.scale
    }

    pub fn stats(&self) -> &UStats {
        &self.stats
    }
}

/// All points of a finished sweep, ordered by ascending scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleSweep {
    results: Vec<ScaleResult>,
    /// Clock resolution observed before the sweep.
    tick_nanos: u64,
}

impl ScaleSweep {
    pub fn new(mut results: Vec<ScaleResult>, tick_nanos: u64) -> Self {
        results.sort_by_key(ScaleResult::scale);
        Self { results, tick_nanos }
    }

    pub fn results(&self) -> &[ScaleResult] {
        &self.results
    }

    pub fn tick_nanos(&self) -> u64 {
        self.tick_nanos
    }

    /// `(scales, average nanoseconds)` in ascending scale order.
    pub fn samples(&self) -> (Vec<f64>, Vec<f64>) {
        self.results
            .iter()
            .map(|r| (r.scale as f64, r.stats.average_nanos() as f64))
            .unzip()
    }

    /// Every catalogue model fitted to this sweep, best first.
    pub fn fit_equations(&self) -> Result<Vec<MathEquation>, BenchError> {
        let (xs, ys) = self.samples();
        rank_catalogue(&xs, &ys)
    }

    /// The best-fitting growth model.
    pub fn best_fit(&self) -> Result<MathEquation, BenchError> {
        let (xs, ys) = self.samples();
        best_fit(&xs, &ys)
    }
}

/// Sweep `work` over data produced by `generator`.
///
/// With `reuse`, each scale's data is generated once and shared by every
/// run; otherwise it is regenerated per run.
pub fn run_scale<T, R, W, G>(
    work: W,
    generator: G,
    reuse: bool,
    config: &SweepConfig,
) -> Result<ScaleSweep, BenchError>
where
    T: Send + Sync + 'static,
    W: Fn(&T) -> R + Send + Sync + 'static,
    G: Fn(usize) -> T + Send + Sync + 'static,
{
    let control = ScaleControl::new(work, generator, reuse);
    run_control(&control, config)
}

/// Sweep a prepared [`ScaleControl`].
pub fn run_control<T>(
    control: &ScaleControl<T>,
    config: &SweepConfig,
) -> Result<ScaleSweep, BenchError>
where
    T: Send + Sync + 'static,
{
    config.validate()?;
    let tick = measure_tick();
    let tick_nanos = u64::try_from(tick.as_nanos()).unwrap_or(u64::MAX);

    if config.warmup {
        let runner = control.build_runner("warmup", 2, config);
        crate::exec::execute(ExecMode::Parallel, "Warmup", vec![runner], &config.parallel)?;
    }

    let mut results = Vec::new();
    for scale in doubling_scales(config.scale_limit) {
        let point = run_point(control, scale, config)?;
        let count = point.stats.count();
        results.push(point);
        if count <= config.min_samples {
            tracing::debug!(scale, count, "sweep halted: too few samples in budget");
            break;
        }
    }

    if results.len() >= config.backfill_threshold {
        let last = results.last().map_or(0, ScaleResult::scale);
        let extra = backfill_scales(last);
        tracing::debug!(last, points = extra.len(), "backfilling sweep");
        for scale in extra {
            results.push(run_point(control, scale, config)?);
        }
    }

    Ok(ScaleSweep::new(results, tick_nanos))
}

fn run_point<T>(
    control: &ScaleControl<T>,
    scale: usize,
    config: &SweepConfig,
) -> Result<ScaleResult, BenchError>
where
    T: Send + Sync + 'static,
{
    let name = format!("Scale {scale}");
    let runner = control.build_runner(name.clone(), scale, config);
    let stats = crate::exec::execute(ExecMode::Sequential, &name, vec![runner], &config.parallel)?
        .into_iter()
        .next()
        .ok_or(BenchError::NoSamples)?;
    tracing::debug!(scale, count = stats.count(), average = stats.average_nanos(), "sweep point");
    Ok(ScaleResult::new(scale, stats))
}

/// Best growth model for a finished sweep.
pub fn detect_growth(sweep: &ScaleSweep) -> Result<MathEquation, BenchError> {
    sweep.best_fit()
}

/// All growth models for a finished sweep, best first.
pub fn rank_growth(sweep: &ScaleSweep) -> Result<Vec<MathEquation>, BenchError> {
    sweep.fit_equations()
}

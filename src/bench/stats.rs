//! Statistics over the raw durations of one finished task.
//!
//! Everything is derived once, at construction, from the nanosecond times
//! of every run. Queries are plain projections of that data; the
//! unit-scaled accessors just divide by the chosen unit's length.

use serde::Serialize;

use crate::domain::TimeUnit;

/// Summary of one task's measured durations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UStats {
    suite: String,
    name: String,
    index: usize,
    /// Nanosecond times in execution order.
    results: Vec<u64>,
    #[serde(skip)]
    sorted: Vec<u64>,
    fastest: u64,
    slowest: u64,
    average: u64,
    p95: u64,
    p99: u64,
    histogram: Vec<usize>,
    unit: TimeUnit,
}

/// floor(log2(time / fastest)) using integer division, as bucket index.
fn log_two(time: u64, fastest: u64) -> usize {
    let ratio = (time / fastest.max(1)).max(1);
    ratio.ilog2() as usize
}

/// Below this many samples the tail percentiles report the slowest run.
const TAIL_RESOLUTION: usize = 100;

/// Value at index floor(len * p / 100) - 1 of `sorted`, clamped to the slice.
///
/// With fewer than `TAIL_RESOLUTION` samples, the 95th percentile and above
/// is the slowest value.
fn percentile_of(sorted: &[u64], p: f64) -> u64 {
    let Some(&slowest) = sorted.last() else {
        return 0;
    };
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 100.0) };
    if sorted.len() < TAIL_RESOLUTION && p >= 95.0 {
        return slowest;
    }
    let at = ((sorted.len() as f64 * p / 100.0).floor() as usize).saturating_sub(1);
    sorted[at.min(sorted.len() - 1)]
}

impl UStats {
    /// Compute statistics from the nanosecond times of each run.
    ///
    /// An empty result set is allowed and reports zero for every value.
    pub fn new(
        suite: impl Into<String>,
        name: impl Into<String>,
        index: usize,
        results: Vec<u64>,
    ) -> Self {
        let mut sorted = results.clone();
        sorted.sort_unstable();

        let fastest = sorted.first().copied().unwrap_or(0);
        let slowest = sorted.last().copied().unwrap_or(0);
        let p95 = percentile_of(&sorted, 95.0);
        let p99 = percentile_of(&sorted, 99.0);

        let average = if sorted.is_empty() {
            0
        } else {
            let sum: u128 = sorted.iter().map(|&t| u128::from(t)).sum();
            (sum / sorted.len() as u128) as u64
        };

        let mut histogram = Vec::new();
        if !sorted.is_empty() {
            histogram = vec![0; log_two(slowest, fastest) + 1];
            for &t in &sorted {
                histogram[log_two(t, fastest)] += 1;
            }
        }

        Self {
            suite: suite.into(),
            name: name.into(),
            index,
            results,
            sorted,
            fastest,
            slowest,
            average,
            p95,
            p99,
            histogram,
            unit: TimeUnit::best_for(fastest),
        }
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registration index of the task (or the scale, for sweep points).
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.results.len()
    }

    /// Nanosecond times in the order they were measured.
    pub fn raw_data(&self) -> &[u64] {
        &self.results
    }

    pub fn fastest_nanos(&self) -> u64 {
        self.fastest
    }

    pub fn slowest_nanos(&self) -> u64 {
        self.slowest
    }

    /// Integer mean; sub-nanosecond remainders are dropped.
    pub fn average_nanos(&self) -> u64 {
        self.average
    }

    pub fn percentile_95_nanos(&self) -> u64 {
        self.p95
    }

    pub fn percentile_99_nanos(&self) -> u64 {
        self.p99
    }

    /// Time at or under which `p` percent of runs completed.
    ///
    /// With few samples the high percentiles collapse onto the slowest run.
    pub fn percentile_nanos(&self, p: f64) -> u64 {
        percentile_of(&self.sorted, p)
    }

    pub fn fastest(&self, unit: TimeUnit) -> f64 {
        unit.convert(self.fastest)
    }

    pub fn slowest(&self, unit: TimeUnit) -> f64 {
        unit.convert(self.slowest)
    }

    pub fn average(&self, unit: TimeUnit) -> f64 {
        unit.convert(self.average)
    }

    pub fn percentile(&self, p: f64, unit: TimeUnit) -> f64 {
        unit.convert(self.percentile_nanos(p))
    }

    pub fn percentile_95(&self, unit: TimeUnit) -> f64 {
        unit.convert(self.p95)
    }

    pub fn percentile_99(&self, unit: TimeUnit) -> f64 {
        unit.convert(self.p99)
    }

    /// Slowest over fastest; `1.0` is perfectly consistent.
    pub fn consistency(&self) -> f64 {
        if self.fastest == 0 {
            return 1.0;
        }
        self.slowest as f64 / self.fastest as f64
    }

    /// Display unit suited to this task's fastest run.
    pub fn good_unit(&self) -> TimeUnit {
        self.unit
    }

    /// Log-2 histogram relative to the fastest run.
    ///
    /// Bucket `i` counts the runs that were between `2^i` and `2^(i+1)` times
    /// as slow as the fastest: `[100, 50, 10, 1, 0, 1]` means 100 runs within
    /// 2x, 50 within 2x..4x, and one outlier between 32x and 64x.
    pub fn histogram(&self) -> &[usize] {
        &self.histogram
    }

    /// Mean time of each of `zones` contiguous blocks of runs, in execution order.
    ///
    /// With 200 runs and 10 zones, each value is the mean of 20 consecutive
    /// runs. When the count does not divide evenly the leading blocks take
    /// one extra run each. Useful for spotting warm-up and plateaus.
    pub fn zone_trend(&self, zones: usize, unit: TimeUnit) -> Vec<f64> {
        let zones = zones.min(self.results.len());
        if zones == 0 {
            return Vec::new();
        }
        let per_block = self.results.len() / zones;
        let overflow = self.results.len() % zones;
        let factor = unit.nanos() as f64;

        let mut out = Vec::with_capacity(zones);
        let mut pos = 0;
        for block in 0..zones {
            let count = per_block + usize::from(block < overflow);
            let nanos: u128 = self.results[pos..pos + count]
                .iter()
                .map(|&t| u128::from(t))
                .sum();
            out.push((nanos as f64 / factor) / count as f64);
            pos += count;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const SMALL: [u64; 7] = [100, 100, 200, 200, 300, 400, 500];

    fn stats(times: &[u64]) -> UStats {
        UStats::new("test", "test", 1, times.to_vec())
    }

    fn ramp() -> Vec<u64> {
        (0..1_000u64).map(|i| (i + 1) * 100).collect()
    }

    #[test]
    fn empty_results() {
        let s = stats(&[]);
        assert_eq!(s.fastest_nanos(), 0);
        assert_eq!(s.slowest_nanos(), 0);
        assert_eq!(s.average_nanos(), 0);
        assert_eq!(s.percentile_95_nanos(), 0);
        assert_eq!(s.percentile_99_nanos(), 0);
        assert!(s.histogram().is_empty());
        assert!(s.zone_trend(10, TimeUnit::Microseconds).is_empty());
    }

    #[test]
    fn single_result() {
        let s = stats(&[100]);
        assert_eq!(s.fastest_nanos(), 100);
        assert_eq!(s.slowest_nanos(), 100);
        assert_eq!(s.histogram(), &[1]);
        assert_eq!(s.percentile_95_nanos(), 100);
        assert_eq!(s.percentile_99_nanos(), 100);
        assert_eq!(s.average_nanos(), 100);
        assert_eq!(s.zone_trend(10, TimeUnit::Nanoseconds), vec![100.0]);
    }

    #[test]
    fn small_scenario() {
        let s = stats(&SMALL);
        assert_eq!(s.fastest_nanos(), 100);
        assert_eq!(s.slowest_nanos(), 500);
        assert_eq!(s.average_nanos(), 257);
        assert_eq!(s.fastest(TimeUnit::Milliseconds), 0.0001);
        assert_eq!(s.slowest(TimeUnit::Milliseconds), 0.0005);
        // Too few samples to resolve the tail.
        assert_eq!(s.percentile_95_nanos(), 500);
        assert_eq!(s.percentile_99_nanos(), 500);
    }

    #[test]
    fn mid_sized_tail_is_the_slowest() {
        for count in [21u64, 50, 99] {
            let s = stats(&(1..=count).collect::<Vec<_>>());
            assert_eq!(s.percentile_95_nanos(), count, "{count} samples");
            assert_eq!(s.percentile_99_nanos(), count, "{count} samples");
            assert_eq!(s.percentile_nanos(95.0), count);
        }
        let s = stats(&(1..=50).collect::<Vec<_>>());
        assert_eq!(s.percentile_nanos(50.0), 25);
    }

    #[test]
    fn tail_resolves_from_one_hundred_samples() {
        let s = stats(&(1..=100).collect::<Vec<_>>());
        assert_eq!(s.percentile_95_nanos(), 95);
        assert_eq!(s.percentile_99_nanos(), 99);
    }

    #[test]
    fn zones_split_unevenly() {
        let s = stats(&SMALL);
        let zones = s.zone_trend(5, TimeUnit::Nanoseconds);
        assert_eq!(zones, vec![100.0, 200.0, 300.0, 400.0, 500.0]);
    }

    #[test]
    fn zones_one_per_run() {
        let times = [1, 2, 3, 4, 5];
        let s = stats(&times);
        let expect: Vec<f64> = times.iter().map(|&t| t as f64 / 1_000_000.0).collect();
        assert_eq!(s.zone_trend(times.len(), TimeUnit::Milliseconds), expect);
        assert!(s.zone_trend(0, TimeUnit::Milliseconds).is_empty());
    }

    #[test]
    fn doubling_histogram() {
        let s = stats(&ramp());
        assert_eq!(s.histogram(), &[1, 2, 4, 8, 16, 32, 64, 128, 256, 489]);
    }

    #[test]
    fn large_percentiles() {
        let times = ramp();
        let s = stats(&times);
        assert_eq!(s.percentile_95_nanos(), 95_000);
        assert_eq!(s.percentile_95_nanos(), times[949]);
        assert_eq!(s.percentile_99_nanos(), times[989]);
        assert_eq!(s.percentile_nanos(50.0), times[499]);
        assert_eq!(s.percentile_nanos(100.0), s.slowest_nanos());
        assert_eq!(s.percentile_nanos(0.0), s.fastest_nanos());
    }

    #[test]
    fn large_average() {
        let times = ramp();
        let sum: u64 = times.iter().sum();
        let s = stats(&times);
        assert_eq!(s.average_nanos(), sum / 1_000);
    }

    #[test]
    fn percentile_ignores_execution_order() {
        let mut times = ramp();
        times.reverse();
        let s = stats(&times);
        assert_eq!(s.percentile_95_nanos(), 95_000);
        assert_eq!(s.raw_data()[0], 100_000);
    }

    #[test]
    fn good_unit_follows_fastest() {
        assert_eq!(stats(&[5_432, 8_954_228]).good_unit(), TimeUnit::Microseconds);
        assert_eq!(stats(&[50]).good_unit(), TimeUnit::Nanoseconds);
    }

    proptest! {
        #[test]
        fn extremes_bound_every_sample(
            times in prop::collection::vec(1u64..1_000_000_000, 1..500),
        ) {
            let s = stats(&times);
            for &t in &times {
                prop_assert!(s.fastest_nanos() <= t && t <= s.slowest_nanos());
            }
        }

        #[test]
        fn histogram_counts_every_sample(
            times in prop::collection::vec(1u64..1_000_000_000, 1..500),
        ) {
            let s = stats(&times);
            prop_assert_eq!(s.histogram().iter().sum::<usize>(), times.len());
        }

        #[test]
        fn zone_trend_conserves_mass(
            times in prop::collection::vec(1u64..1_000_000, 1..500),
            zones in 1usize..40,
        ) {
            let s = stats(&times);
            let trend = s.zone_trend(zones, TimeUnit::Nanoseconds);
            let n = times.len();
            let k = trend.len();
            let total: f64 = trend
                .iter()
                .enumerate()
                .map(|(i, mean)| mean * (n / k + usize::from(i < n % k)) as f64)
                .sum();
            let expect: f64 = times.iter().map(|&t| t as f64).sum();
            prop_assert!((total - expect).abs() <= expect * 1e-9);
        }

        #[test]
        fn percentiles_are_monotone(times in prop::collection::vec(1u64..1_000_000_000, 100..600)) {
            let s = stats(&times);
            prop_assert!(s.percentile_95_nanos() <= s.percentile_99_nanos());
            prop_assert!(s.percentile_99_nanos() <= s.slowest_nanos());
        }

        #[test]
        fn construction_is_pure(times in prop::collection::vec(1u64..1_000_000_000, 0..200)) {
            prop_assert_eq!(stats(&times), stats(&times));
        }
    }
}

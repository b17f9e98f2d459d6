//! End-to-end use of the public API.

use std::sync::Arc;
use std::time::Duration;

use ubench::{
    Bench, BenchError, ExecMode, MathModel, PressConfig, StatsOrder, SweepConfig, TimeUnit, UStats,
    black_box, detect_growth, rank_growth, run_scale, sort_stats,
};

fn fib(n: u32) -> u64 {
    match n {
        0 | 1 => u64::from(n),
        _ => fib(n - 1) + fib(n - 2),
    }
}

fn workload() -> Bench {
    let mut bench = Bench::new("fibonacci");
    bench
        .add_checked_task("fib 10", || fib(black_box(10)), |v: &u64| *v == 55)
        .unwrap();
    bench
        .add_checked_task("fib 15", || fib(black_box(15)), |v: &u64| *v == 610)
        .unwrap();
    bench.add_task("noop", || ()).unwrap();
    bench
}

#[test]
fn every_mode_measures_every_task() {
    let bench = workload();
    for mode in ExecMode::ALL {
        let stats = bench.press(mode, &PressConfig::iterations(200)).unwrap();
        assert_eq!(stats.len(), 3, "{}", mode.display_name());
        for (i, s) in stats.iter().enumerate() {
            assert_eq!(s.index(), i);
            assert_eq!(s.count(), 200);
            assert!(s.fastest_nanos() >= 1);
            assert!(s.fastest_nanos() <= s.average_nanos());
            assert!(s.average_nanos() <= s.slowest_nanos());
            assert_eq!(s.histogram().iter().sum::<usize>(), 200);
        }
    }
}

#[test]
fn stats_sort_by_requested_key() {
    let mut bench = Bench::new("synthetic");
    for (name, nanos) in [("mid", 500u64), ("slow", 900), ("fast", 100)] {
        bench
            .add_raw_task(name, Arc::new(move || -> Result<u64, BenchError> { Ok(nanos) }))
            .unwrap();
    }
    let mut stats = bench.press(ExecMode::Interleaved, &PressConfig::iterations(10)).unwrap();

    sort_stats(&mut stats, StatsOrder::Fastest);
    let names: Vec<&str> = stats.iter().map(UStats::name).collect();
    assert_eq!(names, ["fast", "mid", "slow"]);

    sort_stats(&mut stats, StatsOrder::Slowest);
    assert_eq!(stats[2].name(), "slow");

    sort_stats(&mut stats, StatsOrder::Added);
    let names: Vec<&str> = stats.iter().map(UStats::name).collect();
    assert_eq!(names, ["mid", "slow", "fast"]);
}

#[test]
fn wrong_answer_aborts_the_press() {
    let mut bench = workload();
    bench
        .add_checked_task("fib 5", || fib(black_box(5)), |v: &u64| *v == 6)
        .unwrap();
    for mode in ExecMode::ALL {
        let err = bench.press(mode, &PressConfig::iterations(50)).unwrap_err();
        assert_eq!(err.task(), Some("fib 5"), "{}", mode.display_name());
        assert!(err.to_string().contains("failed validation"));
    }
}

#[test]
fn stable_task_stops_early() {
    let mut bench = Bench::new("plateau");
    bench
        .add_raw_task("steady", Arc::new(|| -> Result<u64, BenchError> { Ok(1_000) }))
        .unwrap();
    let config = PressConfig::iterations(10_000).with_stability(5, 1.0);
    let stats = bench.press(ExecMode::Sequential, &config).unwrap();
    assert_eq!(stats[0].count(), 6);
}

#[test]
fn time_budget_bounds_the_press() {
    let mut bench = Bench::new("sleepy");
    bench
        .add_task("nap", || std::thread::sleep(Duration::from_millis(2)))
        .unwrap();
    let stats = bench
        .press(ExecMode::Sequential, &PressConfig::timed(Duration::from_millis(20)))
        .unwrap();
    let count = stats[0].count();
    assert!((1..=11).contains(&count), "count was {count}");
    assert_eq!(stats[0].good_unit(), TimeUnit::Milliseconds);
}

#[test]
fn raw_data_is_kept_per_task() {
    let stats = workload().press(ExecMode::Sequential, &PressConfig::iterations(5)).unwrap();
    assert!(stats.iter().all(|s| s.raw_data().len() == 5));
    assert_eq!(stats[0].suite(), "fibonacci");
}

#[test]
fn linear_work_sweeps_to_a_growth_model() {
    let config = SweepConfig {
        scale_limit: 1 << 12,
        max_iterations: 50,
        time_limit: Duration::from_millis(100),
        warmup: false,
        ..SweepConfig::default()
    };
    let sweep = run_scale(
        |v: &Vec<u64>| v.iter().fold(0u64, |acc, x| acc.wrapping_add(black_box(*x))),
        |n| (0..n as u64).collect(),
        true,
        &config,
    )
    .unwrap();

    let scales: Vec<usize> = sweep.results().iter().map(|r| r.scale()).collect();
    assert!(scales.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(scales.first(), Some(&1));
    assert_eq!(scales.last(), Some(&4_096));

    let ranked = rank_growth(&sweep).unwrap();
    assert_eq!(ranked.len(), MathModel::CATALOGUE.len());
    let best = detect_growth(&sweep).unwrap();
    assert!(ranked.iter().any(|eq| eq.model() == best.model()));
    assert!(!best.description().is_empty());
}

//! Monotonic timing helpers.

use std::hint::black_box as std_black_box;
use std::time::{Duration, Instant};

/// Number of probes used to estimate the clock's resolution.
const TICK_PROBES: usize = 1_000;

/// Opaque barrier that keeps the optimizer from discarding measured work.
#[inline]
pub fn black_box<T>(x: T) -> T {
    std_black_box(x)
}

/// Nanoseconds elapsed since `start`, saturating at `u64::MAX`.
#[inline]
pub fn elapsed_nanos(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_nanos()).unwrap_or(u64::MAX)
}

/// Time `body`, returning its output and the elapsed nanoseconds.
#[inline]
pub fn time_call<T, F: FnOnce() -> T>(body: F) -> (T, u64) {
    let start = Instant::now();
    let value = black_box(body());
    let nanos = elapsed_nanos(start);
    (value, nanos)
}

/// Smallest observable increment of the monotonic clock.
///
/// Spins until `Instant::now()` changes, repeated `TICK_PROBES` times, and
/// keeps the minimum step. Timings at or below this value carry no
/// information beyond "faster than the clock".
pub fn measure_tick() -> Duration {
    (0..TICK_PROBES)
        .map(|_| single_tick())
        .min()
        .unwrap_or(Duration::ZERO)
}

fn single_tick() -> Duration {
    let start = Instant::now();
    loop {
        let now = Instant::now();
        if now != start {
            return now - start;
        }
    }
}

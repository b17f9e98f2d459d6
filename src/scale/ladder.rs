//! Scale points visited by a sweep.
//!
//! The main ladder doubles from 1 up to the scale limit. Once the ladder
//! ends at `last`, extra points are taken at multiples of `last / 8` below
//! it, skipping `last / 2` and `last / 4` which the ladder already measured:
//!
//! ```text
//! last = 64:  ladder 1 2 4 8 16 32 64
//!             backfill          24 40 48 56
//! ```

/// `1, 2, 4, …` up to and including `limit`.
pub fn doubling_scales(limit: usize) -> impl Iterator<Item = usize> {
    std::iter::successors(Some(1usize), |s| s.checked_mul(2)).take_while(move |&s| s <= limit)
}

/// Extra points below `last`, largest first.
pub fn backfill_scales(last: usize) -> Vec<usize> {
    let step = last >> 3;
    if step == 0 {
        return Vec::new();
    }
    let (half, quarter) = (last >> 1, last >> 2);
    (1..)
        .map(|k| last - k * step)
        .take_while(|&j| j > step)
        .filter(|&j| j != half && j != quarter)
        .collect()
}

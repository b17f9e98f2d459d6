//! Orderings for presenting a batch of task statistics.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::bench::stats::UStats;

/// Key used to order the statistics of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsOrder {
    /// Registration order.
    #[default]
    Added,
    Fastest,
    Slowest,
    Percentile95,
    Percentile99,
    Average,
    /// Slowest-to-fastest ratio, most consistent first.
    Consistency,
}

impl StatsOrder {
    pub fn compare(self, a: &UStats, b: &UStats) -> Ordering {
        match self {
            StatsOrder::Added => a.index().cmp(&b.index()),
            StatsOrder::Fastest => a.fastest_nanos().cmp(&b.fastest_nanos()),
            StatsOrder::Slowest => a.slowest_nanos().cmp(&b.slowest_nanos()),
            StatsOrder::Percentile95 => a.percentile_95_nanos().cmp(&b.percentile_95_nanos()),
            StatsOrder::Percentile99 => a.percentile_99_nanos().cmp(&b.percentile_99_nanos()),
            StatsOrder::Average => a.average_nanos().cmp(&b.average_nanos()),
            StatsOrder::Consistency => a.consistency().total_cmp(&b.consistency()),
        }
    }
}

/// Stable sort of `stats` by `order`.
pub fn sort_stats(stats: &mut [UStats], order: StatsOrder) {
    stats.sort_by(|a, b| order.compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> Vec<UStats> {
        vec![
            UStats::new("s", "wide", 0, vec![100, 1_000]),
            UStats::new("s", "slow", 1, vec![900, 950]),
            UStats::new("s", "quick", 2, vec![50, 60]),
        ]
    }

    fn names(stats: &[UStats]) -> Vec<&str> {
        stats.iter().map(|s| s.name()).collect()
    }

    #[test]
    fn orders_by_each_key() {
        let mut stats = batch();
        sort_stats(&mut stats, StatsOrder::Fastest);
        assert_eq!(names(&stats), ["quick", "wide", "slow"]);

        sort_stats(&mut stats, StatsOrder::Slowest);
        assert_eq!(names(&stats), ["quick", "slow", "wide"]);

        sort_stats(&mut stats, StatsOrder::Consistency);
        assert_eq!(names(&stats), ["slow", "quick", "wide"]);

        sort_stats(&mut stats, StatsOrder::Added);
        assert_eq!(names(&stats), ["wide", "slow", "quick"]);
    }
}

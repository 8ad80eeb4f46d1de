//! Built-in workloads benchmarked by the command-line driver

use std::hint::black_box;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::stats::Numeric;

const SERIES_LEN: usize = 100_000;
const SORT_LEN: usize = 1_000;

/// Named operation the driver can measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workload {
    /// Returns a constant, measures harness overhead
    Constant,
    /// Sum of 100k pseudo-random values scaled to [0, 5)
    SumSeries,
    /// Sum of square roots over the first 100k integers
    SqrtSeries,
    /// Sorts 1k pseudo-random integers and returns the median
    SortSmall,
}

impl Workload {
    pub fn all() -> &'static [Workload] {
        &[
            Workload::Constant,
            Workload::SumSeries,
            Workload::SqrtSeries,
            Workload::SortSmall,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Workload::Constant => "constant",
            Workload::SumSeries => "sum_series",
            Workload::SqrtSeries => "sqrt_series",
            Workload::SortSmall => "sort_small",
        }
    }

    /// Execute the workload once
    pub fn execute(&self, seed: u64) -> Numeric {
        match self {
            Workload::Constant => Numeric::Int(black_box(42)),
            Workload::SumSeries => {
                let mut rng = StdRng::seed_from_u64(seed);
                let sum: f64 = (0..SERIES_LEN).map(|_| rng.gen::<f64>() * 5.0).sum();
                Numeric::Float(black_box(sum))
            }
            Workload::SqrtSeries => {
                let sum: f64 = (0..SERIES_LEN).map(|i| (black_box(i) as f64).sqrt()).sum();
                Numeric::Float(sum)
            }
            Workload::SortSmall => {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut values: Vec<i64> = (0..SORT_LEN)
                    .map(|_| rng.gen_range(0..1_000_000))
                    .collect();
                values.sort_unstable();
                Numeric::Int(black_box(values[SORT_LEN / 2]))
            }
        }
    }

    /// Closure suitable for the harness, reseeding on every call
    pub fn operation(self) -> impl FnMut() -> Numeric + Send + 'static {
        let mut call: u64 = 0;
        move || {
            call = call.wrapping_add(1);
            self.execute(call)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant() {
        assert_eq!(Workload::Constant.execute(1), Numeric::Int(42));
    }

    #[test]
    fn test_sum_series_in_range() {
        let sum = Workload::SumSeries.execute(7).as_f64();
        assert!(sum > 0.0 && sum < 5.0 * SERIES_LEN as f64);
        // Expected value is 2.5 per element
        let mean = sum / SERIES_LEN as f64;
        assert!((mean - 2.5).abs() < 0.1, "mean was {}", mean);
    }

    #[test]
    fn test_deterministic_for_seed() {
        for workload in Workload::all() {
            assert_eq!(workload.execute(3), workload.execute(3));
        }
    }

    #[test]
    fn test_distinct_seeds_vary_inputs() {
        assert_ne!(Workload::SumSeries.execute(1), Workload::SumSeries.execute(2));
        assert_eq!(Workload::SqrtSeries.execute(1), Workload::SqrtSeries.execute(2));
    }

    #[test]
    fn test_sort_small_median_in_bounds() {
        let median = Workload::SortSmall.execute(11).as_i64().unwrap();
        assert!((0..1_000_000).contains(&median));
    }

    #[test]
    fn test_names_match_serde() {
        for workload in Workload::all() {
            let json = serde_json::to_string(workload).unwrap();
            assert_eq!(json, format!("\"{}\"", workload.name()));
        }
    }

    #[test]
    fn test_operation_reseeds() {
        let mut op = Workload::SumSeries.operation();
        assert_ne!(op(), op());
    }
}

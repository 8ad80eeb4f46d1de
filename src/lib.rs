//! Performance Tester Library
//!
//! A timing harness that runs an operation a fixed number of times and
//! summarizes the durations (mean, stdev, min/max, 10th/90th quantiles).
//!
//! ```no_run
//! use performance_tester::{PerformanceTest, TimeUnit};
//!
//! let outcome = PerformanceTest::new(1000, TimeUnit::Milliseconds)
//!     .run(|| (0..10_000u64).sum::<u64>())
//!     .unwrap();
//! println!("{}", outcome.metrics().summary());
//! ```

pub mod core;
pub mod error;
pub mod stats;
pub mod ui;
pub mod utils;

pub use crate::core::{run_benchmark, PerformanceTest, RunOutcome};
pub use error::{PerformanceError, Result};
pub use stats::{Numeric, PerformanceMetrics, ResultValue, TimeUnit};

/// Library version
pub const VERSION: &str = "0.3.2";

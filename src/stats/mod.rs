//! Statistics for performance measurements

pub mod numeric;
pub mod performance_metrics;
pub mod time_unit;

pub use numeric::{Numeric, ResultValue};
pub use performance_metrics::{quantile, PerformanceMetrics, QUANTILE_PROBABILITIES};
pub use time_unit::TimeUnit;

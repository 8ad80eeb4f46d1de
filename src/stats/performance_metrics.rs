//! Descriptive statistics over the durations of a harness run
//!
//! A [`PerformanceMetrics`] is built once from the raw samples of a run and
//! never changes afterwards. Fields are private and only exposed through
//! read-only accessors.

use serde::{Deserialize, Serialize};

use crate::error::{PerformanceError, Result};
use crate::stats::time_unit::TimeUnit;

/// Probabilities of the reported quantile pair
pub const QUANTILE_PROBABILITIES: (f64, f64) = (0.1, 0.9);

/// Immutable snapshot of a run's timing statistics
///
/// Deserializing keeps only `durations` and `time_unit` and recomputes every
/// statistic, so a stored snapshot cannot disagree with its samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredMetrics")]
pub struct PerformanceMetrics {
    durations: Vec<f64>,
    time_unit: TimeUnit,
    mean: f64,
    stdev: f64,
    min: f64,
    max: f64,
    quantiles: (f64, f64),
}

impl PerformanceMetrics {
    /// Build the snapshot from durations measured in seconds.
    ///
    /// The unit conversion is applied once to the whole sequence before any
    /// statistic is derived.
    pub fn from_seconds(mut durations: Vec<f64>, time_unit: TimeUnit) -> Result<Self> {
        Self::check_samples(&durations)?;
        let scale = time_unit.scale();
        if scale != 1.0 {
            durations.iter_mut().for_each(|d| *d *= scale);
        }
        Self::from_scaled(durations, time_unit)
    }

    fn check_samples(durations: &[f64]) -> Result<()> {
        if durations.is_empty() {
            return Err(PerformanceError::Configuration(
                "cannot compute statistics from an empty sample".to_string(),
            ));
        }
        if let Some(bad) = durations.iter().find(|d| !d.is_finite() || **d < 0.0) {
            return Err(PerformanceError::Configuration(format!(
                "durations must be finite and non-negative, got {}",
                bad
            )));
        }
        Ok(())
    }

    /// Statistics over samples already expressed in `time_unit`
    fn from_scaled(durations: Vec<f64>, time_unit: TimeUnit) -> Result<Self> {
        Self::check_samples(&durations)?;
        let n = durations.len() as f64;
        let mean = durations.iter().sum::<f64>() / n;
        // Population variance, divisor n
        let variance = durations.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let stdev = variance.sqrt();

        let mut sorted = durations.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        let quantiles = (
            quantile(&sorted, QUANTILE_PROBABILITIES.0),
            quantile(&sorted, QUANTILE_PROBABILITIES.1),
        );

        // Summation error can push the mean a hair outside [min, max] when all
        // samples are equal
        let mean = mean.clamp(min, max);

        Ok(Self {
            durations,
            time_unit,
            mean,
            stdev,
            min,
            max,
            quantiles,
        })
    }

    /// Scaled duration samples, in iteration order
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation
    pub fn stdev(&self) -> f64 {
        self.stdev
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// 10th and 90th percentiles
    pub fn quantiles(&self) -> (f64, f64) {
        self.quantiles
    }

    /// Plain-text performance summary
    pub fn summary(&self) -> String {
        [
            format!("Performance Summary ({})", self.time_unit),
            format!("Mean of running times: {}", self.mean),
            format!("Stdev: {}", self.stdev),
            format!("Min - Max Time: {} - {}", self.min, self.max),
            format!(
                "Quantiles (10th - 90th): {} - {}",
                self.quantiles.0, self.quantiles.1
            ),
        ]
        .join("\n")
    }
}

/// Serialized form accepted back: the samples and their unit
#[derive(Deserialize)]
struct StoredMetrics {
    durations: Vec<f64>,
    time_unit: TimeUnit,
}

impl TryFrom<StoredMetrics> for PerformanceMetrics {
    type Error = PerformanceError;

    fn try_from(stored: StoredMetrics) -> Result<Self> {
        Self::from_scaled(stored.durations, stored.time_unit)
    }
}

/// Quantile of sorted data, linear interpolation between order statistics
pub fn quantile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }
    let p = p.clamp(0.0, 1.0);
    let h = p * (sorted_data.len() - 1) as f64;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let lower = sorted_data[lo];
    let upper = sorted_data[hi.min(sorted_data.len() - 1)];
    (lower + (h - lo as f64) * (upper - lower)).min(upper)
}

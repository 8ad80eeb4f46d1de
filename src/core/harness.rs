//! Timing harness
//!
//! [`PerformanceTest`] invokes an operation a fixed number of times, times each
//! call with a monotonic clock and summarizes the durations in a
//! [`PerformanceMetrics`] snapshot. Every run owns its own buffers, so one
//! harness value can be reused for any number of independent runs.

use std::convert::Infallible;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::{OperationError, PerformanceError, Result};
use crate::stats::{Numeric, PerformanceMetrics, ResultValue, TimeUnit};

/// Harness configuration: how many times to call the operation and which
/// unit to report durations in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceTest {
    iters: usize,
    time_unit: TimeUnit,
}

impl Default for PerformanceTest {
    fn default() -> Self {
        Self {
            iters: Self::DEFAULT_ITERS,
            time_unit: TimeUnit::default(),
        }
    }
}

impl PerformanceTest {
    pub const DEFAULT_ITERS: usize = 1000;

    /// Create a harness. The configuration is validated when a run starts.
    pub fn new(iters: usize, time_unit: TimeUnit) -> Self {
        Self { iters, time_unit }
    }

    /// Create a harness from a textual unit such as `"ms"` or `"seconds"`
    pub fn with_unit_name(iters: usize, time_unit: &str) -> Result<Self> {
        let harness = Self::new(iters, time_unit.parse()?);
        harness.validate()?;
        Ok(harness)
    }

    pub fn iters(&self) -> usize {
        self.iters
    }

    pub fn time_unit(&self) -> TimeUnit {
        self.time_unit
    }

    /// Check that the configuration can produce statistics
    pub fn validate(&self) -> Result<()> {
        if self.iters == 0 {
            return Err(PerformanceError::Configuration(
                "iters must be a positive integer, got 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Time an infallible operation
    pub fn run<F, R>(&self, mut operation: F) -> Result<RunOutcome>
    where
        F: FnMut() -> R,
        R: ResultValue,
    {
        self.try_run(|| Ok::<R, Infallible>(operation()))
    }

    /// Time an operation, passing it the same arguments on every call
    pub fn run_with_args<A, F, R>(&self, mut operation: F, args: &A) -> Result<RunOutcome>
    where
        A: ?Sized,
        F: FnMut(&A) -> R,
        R: ResultValue,
    {
        self.run(|| operation(args))
    }

    /// Time a fallible operation.
    ///
    /// The first `Err` aborts the run: later iterations never execute and no
    /// metrics are produced.
    pub fn try_run<F, R, E>(&self, mut operation: F) -> Result<RunOutcome>
    where
        F: FnMut() -> std::result::Result<R, E>,
        R: ResultValue,
        E: Into<OperationError>,
    {
        self.validate()?;
        debug!(iters = self.iters, time_unit = %self.time_unit, "starting performance run");

        let mut recorder = Recorder::new(self.iters);
        for iteration in 0..self.iters {
            let start = Instant::now();
            let response = operation();
            let elapsed = start.elapsed();

            let value = response.map_err(|e| {
                let source = e.into();
                warn!(iteration, error = %source, "operation failed, aborting run");
                PerformanceError::OperationFailure { iteration, source }
            })?;
            recorder.record(iteration, elapsed, &value)?;
        }

        recorder.finish(self.time_unit)
    }

    /// Time an operation with a bound on each call.
    ///
    /// Each call runs on a blocking worker; a call that outlives `limit` fails
    /// the run with [`PerformanceError::Timeout`] and is left to finish in the
    /// background. A panicking call fails the run with
    /// [`PerformanceError::OperationFailure`].
    ///
    /// The abandoned call keeps its blocking worker until it returns, and
    /// dropping a tokio runtime waits for blocking workers. A call that never
    /// returns therefore blocks the caller's runtime shutdown even after
    /// `Timeout` has been returned; only exiting the process ends it.
    pub async fn run_with_timeout<F, R>(&self, operation: F, limit: Duration) -> Result<RunOutcome>
    where
        F: FnMut() -> R + Send + 'static,
        R: ResultValue + Send + 'static,
    {
        self.validate()?;
        if limit.is_zero() {
            return Err(PerformanceError::Configuration(
                "per-iteration timeout must be greater than zero".to_string(),
            ));
        }
        debug!(iters = self.iters, ?limit, "starting bounded performance run");

        let mut recorder = Recorder::new(self.iters);
        let mut operation = operation;
        for iteration in 0..self.iters {
            let task = tokio::task::spawn_blocking(move || {
                let mut operation = operation;
                let start = Instant::now();
                let response = operation();
                let elapsed = start.elapsed();
                (operation, response, elapsed)
            });

            let (returned, response, elapsed) = match timeout(limit, task).await {
                Ok(Ok(output)) => output,
                Ok(Err(e)) => {
                    warn!(iteration, error = %e, "operation panicked, aborting run");
                    return Err(PerformanceError::OperationFailure {
                        iteration,
                        source: Box::new(e),
                    });
                }
                Err(_) => {
                    warn!(iteration, ?limit, "operation timed out, aborting run");
                    return Err(PerformanceError::Timeout { iteration, limit });
                }
            };
            operation = returned;
            recorder.record(iteration, elapsed, &response)?;
        }

        recorder.finish(self.time_unit)
    }
}

/// Per-run accumulation buffers. Consumed when the snapshot is built.
struct Recorder {
    durations: Vec<f64>,
    results: Vec<Numeric>,
}

impl Recorder {
    fn new(iters: usize) -> Self {
        Self {
            durations: Vec::with_capacity(iters),
            results: Vec::with_capacity(iters),
        }
    }

    fn record<R: ResultValue + ?Sized>(&mut self, iteration: usize, elapsed: Duration, value: &R) -> Result<()> {
        self.durations.push(elapsed.as_secs_f64());
        match value.to_numeric() {
            Some(numeric) => {
                self.results.push(numeric);
                Ok(())
            }
            None => {
                let type_name = value.type_name();
                warn!(iteration, type_name, "operation returned a non-numeric result");
                Err(PerformanceError::UnsupportedResultType {
                    iteration,
                    type_name,
                })
            }
        }
    }

    fn finish(self, time_unit: TimeUnit) -> Result<RunOutcome> {
        let last_result = match self.results.last() {
            Some(last) => *last,
            None => {
                return Err(PerformanceError::Configuration(
                    "run finished without any iteration".to_string(),
                ))
            }
        };
        let metrics = PerformanceMetrics::from_seconds(self.durations, time_unit)?;
        debug!(
            iters = metrics.len(),
            mean = metrics.mean(),
            time_unit = %time_unit,
            "performance run completed"
        );
        Ok(RunOutcome {
            last_result,
            results: self.results,
            metrics,
        })
    }
}

/// What a successful run hands back: every result plus the metrics snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    last_result: Numeric,
    results: Vec<Numeric>,
    metrics: PerformanceMetrics,
}

impl RunOutcome {
    /// Result of the final iteration
    pub fn last_result(&self) -> Numeric {
        self.last_result
    }

    /// Results of all iterations, in order
    pub fn results(&self) -> &[Numeric] {
        &self.results
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    /// Split into `(last_result, metrics)`
    pub fn into_parts(self) -> (Numeric, PerformanceMetrics) {
        (self.last_result, self.metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_constant_operation() {
        let outcome = PerformanceTest::new(5, TimeUnit::Seconds).run(|| 42).unwrap();
        assert_eq!(outcome.last_result(), Numeric::Int(42));
        assert_eq!(outcome.results(), &[Numeric::Int(42); 5]);

        let metrics = outcome.metrics();
        assert_eq!(metrics.durations().len(), 5);
        assert!(metrics.durations().iter().all(|d| *d >= 0.0));
        assert!(metrics.mean() >= 0.0);
        assert!(metrics.min() <= metrics.mean() && metrics.mean() <= metrics.max());
        assert_eq!(metrics.time_unit(), TimeUnit::Seconds);
    }

    #[test]
    fn test_zero_iters_never_invokes() {
        let calls = Cell::new(0);
        let err = PerformanceTest::new(0, TimeUnit::Seconds)
            .run(|| {
                calls.set(calls.get() + 1);
                1
            })
            .unwrap_err();
        assert!(matches!(err, PerformanceError::Configuration(_)));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_unknown_unit_name() {
        assert!(matches!(
            PerformanceTest::with_unit_name(10, "fortnights"),
            Err(PerformanceError::Configuration(_))
        ));
        let harness = PerformanceTest::with_unit_name(10, "millis").unwrap();
        assert_eq!(harness.time_unit(), TimeUnit::Milliseconds);
        assert!(PerformanceTest::with_unit_name(0, "s").is_err());
    }

    #[test]
    fn test_non_numeric_result_fails_fast() {
        let calls = Cell::new(0);
        let err = PerformanceTest::new(10, TimeUnit::Seconds)
            .run(|| {
                calls.set(calls.get() + 1);
                "text"
            })
            .unwrap_err();
        assert!(matches!(
            err,
            PerformanceError::UnsupportedResultType { iteration: 0, .. }
        ));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_failure_on_third_call_stops_run() {
        let mut calls = 0;
        let err = PerformanceTest::new(10, TimeUnit::Seconds)
            .try_run(|| {
                calls += 1;
                if calls == 3 {
                    Err("runtime error")
                } else {
                    Ok(calls)
                }
            })
            .unwrap_err();
        assert_eq!(calls, 3);
        match err {
            PerformanceError::OperationFailure { iteration, source } => {
                assert_eq!(iteration, 2);
                assert_eq!(source.to_string(), "runtime error");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_all_results_retained() {
        let mut n = 0i64;
        let outcome = PerformanceTest::new(4, TimeUnit::Milliseconds)
            .run(|| {
                n += 1;
                n
            })
            .unwrap();
        assert_eq!(
            outcome.results(),
            &[Numeric::Int(1), Numeric::Int(2), Numeric::Int(3), Numeric::Int(4)]
        );
        let (last, metrics) = outcome.into_parts();
        assert_eq!(last, Numeric::Int(4));
        assert_eq!(metrics.len(), 4);
    }

    #[test]
    fn test_arguments_forwarded_unchanged() {
        let data = vec![1.0f64, 2.0, 3.5];
        let seen = Cell::new(0);
        let outcome = PerformanceTest::new(3, TimeUnit::Seconds)
            .run_with_args(
                |xs: &[f64]| {
                    seen.set(seen.get() + 1);
                    xs.iter().sum::<f64>()
                },
                data.as_slice(),
            )
            .unwrap();
        assert_eq!(seen.get(), 3);
        assert_eq!(outcome.last_result(), Numeric::Float(6.5));
    }

    #[test]
    fn test_harness_is_reusable() {
        let harness = PerformanceTest::new(3, TimeUnit::Seconds);
        let first = harness.run(|| 1).unwrap();
        let second = harness.run(|| 2.0).unwrap();
        assert_eq!(first.metrics().len(), 3);
        assert_eq!(second.metrics().len(), 3);
        assert_eq!(second.last_result(), Numeric::Float(2.0));
    }

    #[test]
    fn test_default_configuration() {
        let harness = PerformanceTest::default();
        assert_eq!(harness.iters(), 1000);
        assert_eq!(harness.time_unit(), TimeUnit::Milliseconds);
    }

    #[tokio::test]
    async fn test_run_with_timeout_completes() {
        let mut n = 0u32;
        let outcome = PerformanceTest::new(4, TimeUnit::Seconds)
            .run_with_timeout(
                move || {
                    n += 1;
                    n
                },
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert_eq!(outcome.last_result(), Numeric::Int(4));
        assert_eq!(outcome.metrics().len(), 4);
    }

    #[tokio::test]
    async fn test_run_with_timeout_times_out() {
        let err = PerformanceTest::new(3, TimeUnit::Seconds)
            .run_with_timeout(
                || {
                    std::thread::sleep(Duration::from_millis(300));
                    1
                },
                Duration::from_millis(20),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, PerformanceError::Timeout { iteration: 0, .. }));
    }

    #[tokio::test]
    async fn test_run_with_timeout_rejects_zero_limit() {
        let err = PerformanceTest::new(3, TimeUnit::Seconds)
            .run_with_timeout(|| 1, Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, PerformanceError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_run_with_timeout_panic_is_operation_failure() {
        let err = PerformanceTest::new(3, TimeUnit::Seconds)
            .run_with_timeout(|| -> i32 { panic!("boom") }, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, PerformanceError::OperationFailure { iteration: 0, .. }));
    }
}

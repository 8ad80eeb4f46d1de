//! A labelled harness run

use serde::Serialize;

use crate::core::harness::RunOutcome;
use crate::stats::PerformanceMetrics;

/// Outcome of measuring one named operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkloadMeasurement {
    pub name: String,
    pub outcome: RunOutcome,
}

impl WorkloadMeasurement {
    pub fn new(name: impl Into<String>, outcome: RunOutcome) -> Self {
        Self {
            name: name.into(),
            outcome,
        }
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        self.outcome.metrics()
    }
}

//! `appsettings.json` configuration for the command-line driver

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::harness::PerformanceTest;
use crate::core::workloads::Workload;
use crate::error::{PerformanceError, Result};
use crate::stats::TimeUnit;

/// Default settings file name, looked up in the working directory
pub const SETTINGS_FILE: &str = "appsettings.json";

/// Environment variable overriding the iteration count
pub const ITERS_ENV: &str = "PERF_ITERS";
/// Environment variable overriding the time unit
pub const TIME_UNIT_ENV: &str = "PERF_TIME_UNIT";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BenchmarkSettings {
    #[serde(rename = "Iterations", deserialize_with = "validate_positive_usize")]
    pub iterations: usize,
    #[serde(rename = "TimeUnit")]
    pub time_unit: TimeUnit,
    /// Per-iteration bound in milliseconds; 0 disables it
    #[serde(rename = "TimeoutMs", default)]
    pub timeout_ms: u64,
    #[serde(rename = "Workloads", default = "default_workloads")]
    pub workloads: Vec<Workload>,
    #[serde(rename = "ResultsCsv", default)]
    pub results_csv: Option<String>,
    #[serde(rename = "ResultsJson", default)]
    pub results_json: Option<String>,
}

fn default_workloads() -> Vec<Workload> {
    Workload::all().to_vec()
}

fn validate_positive_usize<'de, D>(deserializer: D) -> std::result::Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = usize::deserialize(deserializer)?;
    if value > 0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("Value must be positive"))
    }
}

impl Default for BenchmarkSettings {
    fn default() -> Self {
        Self {
            iterations: PerformanceTest::DEFAULT_ITERS,
            time_unit: TimeUnit::default(),
            timeout_ms: 0,
            workloads: default_workloads(),
            results_csv: Some("results.csv".to_string()),
            results_json: Some("results.json".to_string()),
        }
    }
}

impl BenchmarkSettings {
    /// Parse settings from JSON text
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| PerformanceError::Configuration(format!("invalid settings: {}", e)))
    }

    /// Load settings from `path`.
    ///
    /// A missing file yields the defaults, which are written back so the user
    /// has something to edit next time.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), "loaded settings");
                Self::from_json(&content)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let settings = Self::default();
                settings.save(path)?;
                info!(path = %path.display(), "settings file not found, wrote defaults");
                Ok(settings)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Apply `PERF_ITERS` and `PERF_TIME_UNIT` when set
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(env::var(ITERS_ENV).ok(), env::var(TIME_UNIT_ENV).ok())
    }

    fn apply_overrides(&mut self, iters: Option<String>, time_unit: Option<String>) -> Result<()> {
        if let Some(iters) = iters {
            let parsed: usize = iters.trim().parse().map_err(|e| {
                PerformanceError::Configuration(format!("{} must be a positive integer: {}", ITERS_ENV, e))
            })?;
            if parsed == 0 {
                return Err(PerformanceError::Configuration(format!(
                    "{} must be a positive integer, got 0",
                    ITERS_ENV
                )));
            }
            self.iterations = parsed;
        }
        if let Some(unit) = time_unit {
            self.time_unit = unit.parse()?;
        }
        Ok(())
    }

    /// Harness configured from these settings
    pub fn harness(&self) -> Result<PerformanceTest> {
        let harness = PerformanceTest::new(self.iterations, self.time_unit);
        harness.validate()?;
        Ok(harness)
    }

    /// Per-iteration timeout, if enabled
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

//! Harness core and the benchmark driver built on it

pub mod harness;
pub mod measurement;
pub mod settings;
pub mod system_info;
pub mod workloads;

use std::path::Path;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use crate::error::Result;
use crate::ui::report::{colored_summary, comparison_table};
use crate::utils::helpers::{save_durations_csv, save_json_report};

pub use harness::{PerformanceTest, RunOutcome};
pub use measurement::WorkloadMeasurement;
pub use settings::{BenchmarkSettings, SETTINGS_FILE};
pub use system_info::SystemInfo;
pub use workloads::Workload;

/// Measure one workload, bounded per call when `limit` is set
pub async fn measure_workload(
    harness: &PerformanceTest,
    workload: Workload,
    limit: Option<Duration>,
) -> Result<WorkloadMeasurement> {
    let outcome = match limit {
        Some(limit) => harness.run_with_timeout(workload.operation(), limit).await?,
        None => harness.run(workload.operation())?,
    };
    Ok(WorkloadMeasurement::new(workload.name(), outcome))
}

/// Measure every configured workload in order.
///
/// Progress is reported between runs only, never inside a timed loop.
pub async fn run_workloads(settings: &BenchmarkSettings) -> Result<Vec<WorkloadMeasurement>> {
    let harness = settings.harness()?;
    let limit = settings.timeout();

    let pb = ProgressBar::new(settings.workloads.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} workloads {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    let mut measurements = Vec::with_capacity(settings.workloads.len());
    for &workload in &settings.workloads {
        pb.set_message(workload.name());
        let measurement = match measure_workload(&harness, workload, limit).await {
            Ok(m) => m,
            Err(e) => {
                pb.abandon_with_message(format!("{} failed", workload.name()));
                error!(workload = workload.name(), error = %e, "workload measurement failed");
                return Err(e);
            }
        };
        info!(
            workload = workload.name(),
            mean = measurement.metrics().mean(),
            time_unit = %measurement.metrics().time_unit(),
            "workload measured"
        );
        pb.println(format!("{}\n", colored_summary(workload.name(), measurement.metrics())));
        measurements.push(measurement);
        pb.inc(1);
    }
    pb.finish_with_message("all workloads measured");

    Ok(measurements)
}

/// Command-line entry: load settings, measure, report and export
pub async fn run_benchmark() -> Result<()> {
    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("{:^60}", "Performance Tester".bold().cyan());
    println!("{}\n", separator);

    println!("{}", "System Information".bold().yellow());
    println!("━━━━━━━━━━━━━━━━━━━");
    println!("{}\n", SystemInfo::get());

    let mut settings = match BenchmarkSettings::load_or_create(Path::new(SETTINGS_FILE)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{} {}", "❌ Configuration Error:".bold().red(), e);
            return Err(e);
        }
    };
    settings.apply_env_overrides()?;

    println!("{}", "Benchmark Parameters".bold().yellow());
    println!("━━━━━━━━━━━━━━━━━━━━");
    println!("▸ Iterations: {}", settings.iterations);
    println!("▸ Time unit:  {}", settings.time_unit);
    match settings.timeout() {
        Some(limit) => println!("▸ Timeout:    {:?} per iteration", limit),
        None => println!("▸ Timeout:    none"),
    }
    println!(
        "▸ Workloads:  {}\n",
        settings.workloads.iter().map(|w| w.name()).collect::<Vec<_>>().join(", ")
    );

    let measurements = run_workloads(&settings).await?;

    println!("\n{}", "Comparison".bold().yellow());
    println!("━━━━━━━━━━");
    println!("{}", comparison_table(&measurements));

    if let Some(ref path) = settings.results_csv {
        save_durations_csv(Path::new(path), &measurements)?;
        println!("✅ Raw durations saved to {}", path);
    }
    if let Some(ref path) = settings.results_json {
        save_json_report(Path::new(path), &measurements)?;
        println!("✅ Report saved to {}", path);
    }

    Ok(())
}

//! Export helpers for measurement results

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::core::measurement::WorkloadMeasurement;
use crate::error::Result;

#[derive(Debug, Serialize)]
struct DurationRow<'a> {
    workload: &'a str,
    iteration: usize,
    duration: f64,
    time_unit: &'static str,
}

/// Write one CSV row per recorded duration
pub fn write_durations_csv<W: Write>(writer: W, measurements: &[WorkloadMeasurement]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for m in measurements {
        let metrics = m.metrics();
        let time_unit = metrics.time_unit().suffix();
        for (iteration, &duration) in metrics.durations().iter().enumerate() {
            csv_writer.serialize(DurationRow {
                workload: &m.name,
                iteration,
                duration,
                time_unit,
            })?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn save_durations_csv(path: &Path, measurements: &[WorkloadMeasurement]) -> Result<()> {
    let file = File::create(path)?;
    write_durations_csv(BufWriter::new(file), measurements)
}

/// Write the measurements, snapshots included, as pretty JSON
pub fn write_json_report<W: Write>(writer: W, measurements: &[WorkloadMeasurement]) -> Result<()> {
    serde_json::to_writer_pretty(writer, measurements)?;
    Ok(())
}

pub fn save_json_report(path: &Path, measurements: &[WorkloadMeasurement]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_json_report(&mut writer, measurements)?;
    writer.flush()?;
    Ok(())
}

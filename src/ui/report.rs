//! Terminal rendering of performance snapshots

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Color, Table};

use crate::core::measurement::WorkloadMeasurement;
use crate::stats::PerformanceMetrics;

/// Summary of one snapshot, colored for the terminal
pub fn colored_summary(title: &str, metrics: &PerformanceMetrics) -> String {
    let (q10, q90) = metrics.quantiles();
    let unit = metrics.time_unit().suffix();
    [
        format!(
            "{} {}",
            title.bold().cyan(),
            format!("({}, {} iterations)", metrics.time_unit(), metrics.len()).dimmed()
        ),
        format!("   Mean of running times: {}", format!("{:.6} {}", metrics.mean(), unit).bold().green()),
        format!("   Stdev:                 {:.6} {}", metrics.stdev(), unit),
        format!("   Min - Max Time:        {:.6} - {:.6} {}", metrics.min(), metrics.max(), unit),
        format!("   Quantiles (10th - 90th): {:.6} - {:.6} {}", q10, q90, unit),
    ]
    .join("\n")
}

/// Side-by-side comparison of several measurements, fastest mean highlighted
pub fn comparison_table(measurements: &[WorkloadMeasurement]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Workload", "Iterations", "Unit", "Mean", "Stdev", "Min", "Max", "P10", "P90",
    ]);

    let fastest = measurements
        .iter()
        .map(|m| m.metrics().mean())
        .fold(f64::INFINITY, f64::min);

    for m in measurements {
        let metrics = m.metrics();
        let (q10, q90) = metrics.quantiles();
        let mut mean_cell = Cell::new(format!("{:.6}", metrics.mean())).set_alignment(CellAlignment::Right);
        if metrics.mean() == fastest {
            mean_cell = mean_cell.fg(Color::Green);
        }
        table.add_row(vec![
            Cell::new(&m.name),
            Cell::new(metrics.len()).set_alignment(CellAlignment::Right),
            Cell::new(metrics.time_unit().suffix()),
            mean_cell,
            number_cell(metrics.stdev()),
            number_cell(metrics.min()),
            number_cell(metrics.max()),
            number_cell(q10),
            number_cell(q90),
        ]);
    }
    table
}

fn number_cell(value: f64) -> Cell {
    Cell::new(format!("{:.6}", value)).set_alignment(CellAlignment::Right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::harness::PerformanceTest;
    use crate::stats::TimeUnit;

    fn measurement(name: &str) -> WorkloadMeasurement {
        let outcome = PerformanceTest::new(5, TimeUnit::Milliseconds).run(|| 1).unwrap();
        WorkloadMeasurement::new(name, outcome)
    }

    #[test]
    fn test_colored_summary_contents() {
        let metrics = PerformanceMetrics::from_seconds(vec![0.001, 0.003], TimeUnit::Milliseconds).unwrap();
        let text = colored_summary("sum_series", &metrics);
        assert!(text.contains("sum_series"));
        assert!(text.contains("Mean of running times"));
        assert!(text.contains("2.000000 ms"));
        assert!(text.contains("2 iterations"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn test_comparison_table_rows() {
        let rows = vec![measurement("alpha"), measurement("beta")];
        let rendered = comparison_table(&rows).to_string();
        assert!(rendered.contains("Workload"));
        assert!(rendered.contains("alpha"));
        assert!(rendered.contains("beta"));
        assert!(rendered.contains("ms"));
    }
}

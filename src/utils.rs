//! Text rendering of metric tables and Pareto fronts.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::metrics::MetricTable;
use crate::pareto::{AggregatedFront, AxisDomain};
use crate::session::ResultsView;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Render a metric table, marking the best cells of each row with `*`.
pub fn format_metrics_table(table: &MetricTable) -> Result<String> {
    let width = table
        .algorithms
        .iter()
        .map(|a| a.len())
        .max()
        .unwrap_or(0)
        .max(10)
        + 2;

    let mut out = String::new();
    out.push_str(&format!("Performance metrics for {}\n", table.key));
    out.push_str(&format!("{:<8}", "Metric"));
    for algorithm in &table.algorithms {
        out.push_str(&format!("{:>width$}", algorithm, width = width));
    }
    out.push('\n');

    for row in &table.rows {
        let best = row.best()?;
        out.push_str(&format!("{:<8}", row.kind.name()));
        for (i, value) in row.values().iter().enumerate() {
            let marker = if best.contains(&i) { "*" } else { " " };
            let cell = format!("{:.4}{}", value, marker);
            out.push_str(&format!("{:>width$}", cell, width = width));
        }
        out.push('\n');
    }

    Ok(out)
}

fn scale(value: f64, domain: &AxisDomain, cells: usize) -> usize {
    if domain.span() <= 0.0 {
        return cells / 2;
    }
    let ratio = ((value - domain.min) / domain.span()).clamp(0.0, 1.0);
    (ratio * (cells as f64 - 1.0)).round() as usize
}

/// Draw the aggregated front as an ASCII scatter plot.
///
/// Makespan runs left to right and TEC bottom to top; each series gets its own
/// symbol. Overlapping points keep the symbol of the later series.
pub fn render_front(front: &AggregatedFront, width: usize, height: usize) -> String {
    let width = width.max(2);
    let height = height.max(2);
    let symbols = ['*', '+', 'x', '#', '@', '&', '%', '=', '^', '$'];
    let labels = front.labels();

    let mut grid = vec![vec![' '; width]; height];
    for tagged in &front.flattened {
        let series = labels
            .iter()
            .position(|l| *l == tagged.algorithm)
            .unwrap_or(0);
        let x = scale(tagged.point.makespan, &front.domain.makespan, width);
        let y = scale(tagged.point.tec, &front.domain.tec, height);
        grid[height - 1 - y][x] = symbols[series % symbols.len()];
    }

    let mut out = String::new();
    out.push_str(&format!(
        "TEC [{:.2}, {:.2}] vs makespan [{:.2}, {:.2}]\n",
        front.domain.tec.min,
        front.domain.tec.max,
        front.domain.makespan.min,
        front.domain.makespan.max
    ));
    for row in &grid {
        out.push('|');
        out.extend(row.iter());
        out.push('\n');
    }
    out.push('+');
    out.push_str(&"-".repeat(width));
    out.push('\n');

    let legend = labels
        .iter()
        .enumerate()
        .map(|(i, l)| format!("{} {}", symbols[i % symbols.len()], l))
        .join("  ");
    out.push_str(&legend);
    out.push('\n');
    out
}

/// Save the metric table and per-series best objectives of a view.
pub fn save_report<P: AsRef<Path>>(view: &ResultsView, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut file = File::create(path).map_err(|e| Error::io(path, e))?;

    let mut text = format!("Results for {}\n\n", view.key);
    match &view.table {
        Some(table) => text.push_str(&format_metrics_table(table)?),
        None => text.push_str("No metrics data available for this configuration\n"),
    }
    text.push('\n');

    for series in &view.series {
        match (series.best_makespan(), series.best_tec()) {
            (Some(makespan), Some(tec)) => text.push_str(&format!(
                "{}: {} points, best makespan {:.2}, best TEC {:.2}\n",
                series.algorithm,
                series.len(),
                makespan,
                tec
            )),
            _ => text.push_str(&format!("{}: no points\n", series.algorithm)),
        }
    }

    file.write_all(text.as_bytes()).map_err(|e| Error::io(path, e))
}

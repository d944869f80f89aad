//! Unit tests for the text rendering helpers.

use std::fs;
use std::time::Duration;

use flowshop_results::data::MockDataSource;
use flowshop_results::instance::InstanceKey;
use flowshop_results::metrics::MetricTable;
use flowshop_results::pareto::{aggregate, ParetoPoint, ParetoSeries};
use flowshop_results::utils::{format_duration, format_metrics_table, render_front, save_report};
use flowshop_results::{Config, ConfigKey, ResultsSession};

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(Duration::from_secs(0)), "0h 00m 00s");
    assert_eq!(format_duration(Duration::from_secs(3725)), "1h 02m 05s");
}

#[test]
fn test_metrics_table_marks_best_cells() {
    let records = MockDataSource::mock_metrics(InstanceKey::new(30, 10, 1));
    let table = MetricTable::from_records(&records).unwrap();
    let text = format_metrics_table(&table).unwrap();

    assert!(text.starts_with("Performance metrics for J30_M10_I1"));
    assert!(text.contains("HNSGA-II"));

    // One best cell per row, all in the first column
    let igd_line = text.lines().find(|l| l.starts_with("IGD")).unwrap();
    assert_eq!(igd_line.matches('*').count(), 1);
    assert!(igd_line.contains("0.0070*"));
    assert_eq!(text.matches('*').count(), 5);
}

#[test]
fn test_render_front_places_extremes_in_corners() {
    let front = aggregate(&[
        ParetoSeries::new("A", vec![ParetoPoint::new(0.0, 10.0)]),
        ParetoSeries::new("B", vec![ParetoPoint::new(10.0, 0.0)]),
    ]);

    let text = render_front(&front, 10, 5);
    let lines: Vec<&str> = text.lines().collect();

    // Header, 5 grid rows, axis, legend
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[1], "|*         ");
    assert_eq!(lines[5], "|         +");
    assert_eq!(lines[7], "* A  + B");
}

#[test]
fn test_render_empty_front() {
    let text = render_front(&aggregate(&[]), 4, 2);
    assert!(text.contains("|    "));
    assert!(text.starts_with("TEC [0.00, 1.00]"));
}

#[test]
fn test_save_report() {
    let mut session = ResultsSession::new(Config::new());
    let key = ConfigKey::new(InstanceKey::new(30, 10, 1), "comparison", "all");
    session.refresh(&MockDataSource, key);
    let view = session.view().unwrap();

    let path = std::env::temp_dir().join(format!("flowshop_report_{}.txt", std::process::id()));
    save_report(view, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("Results for J30_M10_I1/comparison/all"));
    assert!(text.contains("HMOSA: 20 points"));
    let _ = fs::remove_file(&path);
}

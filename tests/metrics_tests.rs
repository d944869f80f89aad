//! Tests for best-value selection and the performance table.

use std::collections::BTreeSet;

use flowshop_results::data::MockDataSource;
use flowshop_results::instance::InstanceKey;
use flowshop_results::metrics::{
    best_indices, Direction, MetricKind, MetricRow, MetricTable, MetricsRecord,
};
use flowshop_results::Error;

fn set(indices: &[usize]) -> BTreeSet<usize> {
    indices.iter().copied().collect()
}

/// Creates a record for the given algorithm on instance J30_M10_I1.
fn create_test_record(algorithm: &str, igd: f64, sns: f64) -> MetricsRecord {
    MetricsRecord {
        instance: 1,
        machines: 10,
        jobs: 30,
        algorithm: algorithm.to_string(),
        igd,
        gd: 2.0,
        sns,
        nps: 100.0,
        exec_time: 4.0,
    }
}

#[test]
fn test_igd_row_picks_minimum() {
    let best = best_indices(&[0.01, 0.02, 0.03, 0.004], Direction::Minimize).unwrap();
    assert_eq!(best, set(&[3]));
}

#[test]
fn test_sns_row_picks_maximum() {
    let best = best_indices(&[0.8, 0.7, 0.6, 0.5], Direction::Maximize).unwrap();
    assert_eq!(best, set(&[0]));
}

#[test]
fn test_single_value_is_always_best() {
    for direction in [Direction::Minimize, Direction::Maximize] {
        assert_eq!(best_indices(&[42.0], direction).unwrap(), set(&[0]));
    }
}

#[test]
fn test_full_tie_returns_every_index() {
    for direction in [Direction::Minimize, Direction::Maximize] {
        let best = best_indices(&[3.0, 3.0, 3.0], direction).unwrap();
        assert_eq!(best, set(&[0, 1, 2]));
    }
}

#[test]
fn test_partial_tie_keeps_all_matches() {
    let best = best_indices(&[5.0, 1.0, 7.0, 1.0], Direction::Minimize).unwrap();
    assert_eq!(best, set(&[1, 3]));

    let best = best_indices(&[5.0, 7.0, 1.0, 7.0], Direction::Maximize).unwrap();
    assert_eq!(best, set(&[1, 3]));
}

#[test]
fn test_empty_row_is_invalid() {
    for direction in [Direction::Minimize, Direction::Maximize] {
        let result = best_indices(&[], direction);
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}

#[test]
fn test_best_matches_extreme_for_varied_rows() {
    let rows: [&[f64]; 4] = [
        &[1.5, -2.0, 0.0],
        &[10.0, 9.0, 8.0, 9.0, 8.0],
        &[0.1],
        &[2.0, 2.0, 1.0, 3.0, 3.0],
    ];

    for values in rows {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let expected_min: BTreeSet<usize> =
            (0..values.len()).filter(|&i| values[i] == min).collect();
        let expected_max: BTreeSet<usize> =
            (0..values.len()).filter(|&i| values[i] == max).collect();

        assert_eq!(
            best_indices(values, Direction::Minimize).unwrap(),
            expected_min
        );
        assert_eq!(
            best_indices(values, Direction::Maximize).unwrap(),
            expected_max
        );
    }
}

#[test]
fn test_metric_row_uses_kind_direction() {
    let row = MetricRow::new(
        MetricKind::Nps,
        vec![
            ("HNSGA-II".to_string(), 120.0),
            ("HMOSA".to_string(), 80.0),
            ("HMOGVNS".to_string(), 120.0),
        ],
    )
    .unwrap();

    assert_eq!(row.best().unwrap(), set(&[0, 2]));
    assert_eq!(row.best_labels().unwrap(), vec!["HNSGA-II", "HMOGVNS"]);
}

#[test]
fn test_gap_row_minimizes() {
    let row = MetricRow::new(
        MetricKind::GapAlgorithm,
        vec![
            ("HNSGA-II".to_string(), 1.2),
            ("HMOSA".to_string(), 0.4),
            ("HMOGVNS".to_string(), 0.9),
        ],
    )
    .unwrap();

    assert_eq!(row.best_labels().unwrap(), vec!["HMOSA"]);
}

#[test]
fn test_metric_row_rejects_duplicate_labels() {
    let result = MetricRow::new(
        MetricKind::Igd,
        vec![("A".to_string(), 1.0), ("A".to_string(), 2.0)],
    );
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_table_from_records() {
    let records = vec![
        create_test_record("HNSGA-II", 0.004, 0.71),
        create_test_record("HMOSA", 0.010, 0.79),
        create_test_record("HMOGVNS", 0.020, 0.60),
    ];

    let table = MetricTable::from_records(&records).unwrap();
    assert_eq!(table.key, InstanceKey::new(30, 10, 1));
    assert_eq!(table.algorithms, vec!["HNSGA-II", "HMOSA", "HMOGVNS"]);
    assert_eq!(table.rows.len(), MetricKind::TABLE.len());

    let igd = table.row(MetricKind::Igd).unwrap();
    assert_eq!(igd.best().unwrap(), set(&[0]));

    let sns = table.row(MetricKind::Sns).unwrap();
    assert_eq!(sns.best().unwrap(), set(&[1]));

    // Identical GD values tie across the whole row
    let gd = table.row(MetricKind::Gd).unwrap();
    assert_eq!(gd.best().unwrap(), set(&[0, 1, 2]));

    let cells = table.best_cells().unwrap();
    assert_eq!(cells.len(), 5);
    assert_eq!(cells[0].0, MetricKind::Igd);
}

#[test]
fn test_table_rejects_mixed_instances() {
    let mut other = create_test_record("HMOSA", 0.01, 0.7);
    other.instance = 2;
    let records = vec![create_test_record("HNSGA-II", 0.02, 0.7), other];

    assert!(matches!(
        MetricTable::from_records(&records),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_table_from_no_records_is_empty_dataset() {
    assert!(matches!(
        MetricTable::from_records(&[]),
        Err(Error::EmptyDataset(_))
    ));
}

#[test]
fn test_mock_metrics_rank_first_algorithm_best() {
    let records = MockDataSource::mock_metrics(InstanceKey::new(30, 10, 1));
    let table = MetricTable::from_records(&records).unwrap();

    for (kind, best) in table.best_cells().unwrap() {
        assert_eq!(best, set(&[0]), "{} should favour HNSGA-II", kind);
    }
}

#[test]
fn test_records_deserialize_from_json() {
    let json = r#"[
        {"instance": 1, "machines": 10, "jobs": 30, "algorithm": "HNSGA-II",
         "igd": 0.005, "gd": 1.5, "sns": 0.79, "nps": 90, "exec_time": 3.2}
    ]"#;

    let records: Vec<MetricsRecord> = serde_json::from_str(json).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].algorithm, "HNSGA-II");
    assert_eq!(records[0].value(MetricKind::Nps), Some(90.0));
    assert_eq!(records[0].value(MetricKind::GapModel), None);
}

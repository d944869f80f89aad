//! Performance metrics and best-value selection for comparison tables.
//!
//! Every comparison table in the study ranks a handful of algorithms on a
//! handful of quality indicators. Each indicator has a fixed direction:
//! distances, run times and gaps are minimized, spacing and solution counts
//! are maximized. The cells holding the best value of a row are highlighted;
//! ties are kept, so several cells of a row may be marked.

use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::instance::InstanceKey;

/// Whether lower or higher values of a metric are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    /// Returns true if `candidate` is strictly better than `incumbent`.
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Direction::Minimize => candidate < incumbent,
            Direction::Maximize => candidate > incumbent,
        }
    }
}

/// Quality indicators reported by the comparison tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricKind {
    /// Inverted generational distance
    Igd,
    /// Generational distance
    Gd,
    /// Spread of non-dominated solutions
    Sns,
    /// Number of Pareto solutions
    Nps,
    /// Execution time in seconds
    ExecTime,
    /// Gap between the ILP model and its lower bound
    GapModel,
    /// Gap between a metaheuristic and the reference value
    GapAlgorithm,
}

impl MetricKind {
    /// Metrics shown in the per-instance performance table, in column order.
    pub const TABLE: [MetricKind; 5] = [
        MetricKind::Igd,
        MetricKind::Gd,
        MetricKind::Sns,
        MetricKind::Nps,
        MetricKind::ExecTime,
    ];

    /// The fixed optimization direction of this metric.
    pub fn direction(self) -> Direction {
        match self {
            MetricKind::Sns | MetricKind::Nps => Direction::Maximize,
            MetricKind::Igd
            | MetricKind::Gd
            | MetricKind::ExecTime
            | MetricKind::GapModel
            | MetricKind::GapAlgorithm => Direction::Minimize,
        }
    }

    /// Short column header.
    pub fn name(self) -> &'static str {
        match self {
            MetricKind::Igd => "IGD",
            MetricKind::Gd => "GD",
            MetricKind::Sns => "SNS",
            MetricKind::Nps => "NPS",
            MetricKind::ExecTime => "Exec",
            MetricKind::GapModel => "Gap model",
            MetricKind::GapAlgorithm => "Gap",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Find the indices holding the best value of a row.
///
/// Returns every index whose value equals the row minimum (`Minimize`) or
/// maximum (`Maximize`). `NaN` is never best and is ignored when locating the
/// extreme, so a row made only of `NaN` yields an empty set. Infinities take
/// part in the comparison like any other value.
///
/// # Errors
/// `Error::InvalidArgument` if `values` is empty.
pub fn best_indices(values: &[f64], direction: Direction) -> Result<BTreeSet<usize>> {
    if values.is_empty() {
        return Err(Error::invalid("metric row must hold at least one value"));
    }

    let extreme = values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .reduce(|best, v| if direction.is_better(v, best) { v } else { best });

    let Some(extreme) = extreme else {
        return Ok(BTreeSet::new());
    };

    Ok(values.iter().positions(|&v| v == extreme).collect())
}

/// One metric measured for several competing algorithms on one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub kind: MetricKind,
    entries: Vec<(String, f64)>,
}

impl MetricRow {
    /// Create a row; labels must be unique.
    pub fn new(kind: MetricKind, entries: Vec<(String, f64)>) -> Result<Self> {
        if let Some(label) = entries.iter().map(|(label, _)| label).duplicates().next() {
            return Err(Error::invalid(format!(
                "duplicate label '{}' in {} row",
                label, kind
            )));
        }

        Ok(MetricRow { kind, entries })
    }

    pub fn entries(&self) -> &[(String, f64)] {
        &self.entries
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|&(_, value)| value).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indices of the best entries, using the metric's direction.
    pub fn best(&self) -> Result<BTreeSet<usize>> {
        best_indices(&self.values(), self.kind.direction())
    }

    /// Labels of the best entries, in row order.
    pub fn best_labels(&self) -> Result<Vec<&str>> {
        let best = self.best()?;
        Ok(best.iter().map(|&i| self.entries[i].0.as_str()).collect())
    }
}

/// A single line of the metrics results file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    pub instance: u32,
    pub machines: u32,
    pub jobs: u32,
    pub algorithm: String,
    pub igd: f64,
    #[serde(default)]
    pub gd: f64,
    pub sns: f64,
    pub nps: f64,
    pub exec_time: f64,
}

impl MetricsRecord {
    pub fn key(&self) -> InstanceKey {
        InstanceKey::new(self.jobs, self.machines, self.instance)
    }

    /// Value of the given metric, if the record carries it.
    pub fn value(&self, kind: MetricKind) -> Option<f64> {
        match kind {
            MetricKind::Igd => Some(self.igd),
            MetricKind::Gd => Some(self.gd),
            MetricKind::Sns => Some(self.sns),
            MetricKind::Nps => Some(self.nps),
            MetricKind::ExecTime => Some(self.exec_time),
            MetricKind::GapModel | MetricKind::GapAlgorithm => None,
        }
    }
}

/// Per-instance performance table: one row per metric, one column per algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    pub key: InstanceKey,
    pub algorithms: Vec<String>,
    pub rows: Vec<MetricRow>,
}

impl MetricTable {
    /// Build the table from the records of a single instance.
    pub fn from_records(records: &[MetricsRecord]) -> Result<Self> {
        let first = records
            .first()
            .ok_or_else(|| Error::EmptyDataset("no metrics records".to_string()))?;
        let key = first.key();

        if let Some(other) = records.iter().find(|r| r.key() != key) {
            return Err(Error::invalid(format!(
                "records mix instances {} and {}",
                key,
                other.key()
            )));
        }

        let algorithms: Vec<String> = records.iter().map(|r| r.algorithm.clone()).collect();

        let rows = MetricKind::TABLE
            .iter()
            .map(|&kind| {
                let entries = records
                    .iter()
                    .filter_map(|r| r.value(kind).map(|v| (r.algorithm.clone(), v)))
                    .collect();
                MetricRow::new(kind, entries)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MetricTable {
            key,
            algorithms,
            rows,
        })
    }

    pub fn row(&self, kind: MetricKind) -> Option<&MetricRow> {
        self.rows.iter().find(|row| row.kind == kind)
    }

    /// Best cells of every row, in row order.
    pub fn best_cells(&self) -> Result<Vec<(MetricKind, BTreeSet<usize>)>> {
        self.rows
            .iter()
            .map(|row| row.best().map(|best| (row.kind, best)))
            .collect()
    }
}

/// Relative gap in percent between `value` and `reference`.
pub fn relative_gap(value: f64, reference: f64) -> Result<f64> {
    if reference == 0.0 {
        return Err(Error::invalid("gap reference must be non-zero"));
    }
    Ok((value - reference) / reference * 100.0)
}

/// Arithmetic mean; an empty slice averages to zero.
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_are_fixed() {
        assert_eq!(MetricKind::Igd.direction(), Direction::Minimize);
        assert_eq!(MetricKind::GapModel.direction(), Direction::Minimize);
        assert_eq!(MetricKind::Sns.direction(), Direction::Maximize);
        assert_eq!(MetricKind::Nps.direction(), Direction::Maximize);
    }

    #[test]
    fn nan_is_never_best() {
        let best = best_indices(&[f64::NAN, 2.0, 1.0], Direction::Maximize).unwrap();
        assert_eq!(best.into_iter().collect::<Vec<_>>(), vec![1]);

        let best = best_indices(&[f64::NAN, f64::NAN], Direction::Minimize).unwrap();
        assert!(best.is_empty());
    }

    #[test]
    fn infinity_compares_naturally() {
        let best = best_indices(&[1.0, f64::NEG_INFINITY], Direction::Minimize).unwrap();
        assert_eq!(best.into_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn gap_and_average() {
        assert!((relative_gap(110.0, 100.0).unwrap() - 10.0).abs() < 1e-9);
        assert!(relative_gap(1.0, 0.0).is_err());
        assert_eq!(average(&[]), 0.0);
        assert!((average(&[1.0, 2.0, 3.0]) - 2.0).abs() < 1e-12);
    }
}

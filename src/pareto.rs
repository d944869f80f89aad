//! Pareto fronts: points, series, dominance filtering and chart aggregation.

use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A solution's objective values: makespan and total energy cost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParetoPoint {
    pub makespan: f64,
    pub tec: f64,
}

impl ParetoPoint {
    pub fn new(makespan: f64, tec: f64) -> Self {
        ParetoPoint { makespan, tec }
    }

    pub fn is_finite(&self) -> bool {
        self.makespan.is_finite() && self.tec.is_finite()
    }
}

/// Returns true if `a` dominates `b`.
///
/// Both objectives are minimized: `a` must be no worse on both and strictly
/// better on at least one.
pub fn dominates(a: &ParetoPoint, b: &ParetoPoint) -> bool {
    a.makespan <= b.makespan && a.tec <= b.tec && (a.makespan < b.makespan || a.tec < b.tec)
}

/// Keep the points that no other point dominates, in their original order.
///
/// Identical points do not dominate each other, so duplicates survive together.
pub fn non_dominated(points: &[ParetoPoint]) -> Vec<ParetoPoint> {
    points
        .iter()
        .filter(|candidate| !points.iter().any(|other| dominates(other, candidate)))
        .copied()
        .collect()
}

/// The front produced by one algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoSeries {
    pub algorithm: String,
    pub points: Vec<ParetoPoint>,
}

impl ParetoSeries {
    pub fn new(algorithm: impl Into<String>, points: Vec<ParetoPoint>) -> Self {
        ParetoSeries {
            algorithm: algorithm.into(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Smallest makespan of the series.
    pub fn best_makespan(&self) -> Option<f64> {
        self.points.iter().map(|p| p.makespan).reduce(f64::min)
    }

    /// Smallest TEC of the series.
    pub fn best_tec(&self) -> Option<f64> {
        self.points.iter().map(|p| p.tec).reduce(f64::min)
    }

    /// Remove dominated points from the series.
    pub fn into_non_dominated(self) -> Self {
        let points = non_dominated(&self.points);
        ParetoSeries { points, ..self }
    }
}

/// Closed interval of one chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

impl AxisDomain {
    /// Domain used when there is nothing to plot.
    pub const PLACEHOLDER: AxisDomain = AxisDomain { min: 0.0, max: 1.0 };

    pub fn new(min: f64, max: f64) -> Self {
        AxisDomain { min, max }
    }

    /// Smallest domain covering `values`, if there are any.
    fn covering(values: impl Iterator<Item = f64>) -> Option<Self> {
        match values.minmax_by(|a, b| a.total_cmp(b)) {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(v) => Some(AxisDomain::new(v, v)),
            MinMaxResult::MinMax(min, max) => Some(AxisDomain::new(min, max)),
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Axis domains of a makespan/TEC scatter chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartDomain {
    pub makespan: AxisDomain,
    pub tec: AxisDomain,
}

impl ChartDomain {
    /// Scale both bounds of both axes, e.g. `padded(0.95, 1.05)`.
    pub fn padded(&self, lower: f64, upper: f64) -> Self {
        let pad = |d: AxisDomain| AxisDomain::new(d.min * lower, d.max * upper);
        ChartDomain {
            makespan: pad(self.makespan),
            tec: pad(self.tec),
        }
    }
}

/// A point tagged with the series it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedPoint {
    pub algorithm: String,
    pub point: ParetoPoint,
}

/// Plotting-ready view of several series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedFront {
    /// All points, series order first, then point order.
    pub flattened: Vec<TaggedPoint>,
    pub domain: ChartDomain,
}

impl AggregatedFront {
    /// Series labels in first-appearance order.
    pub fn labels(&self) -> Vec<&str> {
        self.flattened
            .iter()
            .map(|t| t.algorithm.as_str())
            .unique()
            .collect()
    }
}

/// Flatten `series` and compute the domain covering every point.
///
/// With no point at all, both axes fall back to `[0, 1]`.
pub fn aggregate(series: &[ParetoSeries]) -> AggregatedFront {
    aggregate_with(series, AxisDomain::PLACEHOLDER)
}

/// Like [`aggregate`], with an explicit placeholder for empty charts.
pub fn aggregate_with(series: &[ParetoSeries], empty: AxisDomain) -> AggregatedFront {
    let flattened: Vec<TaggedPoint> = series
        .iter()
        .flat_map(|s| {
            s.points.iter().map(move |&point| TaggedPoint {
                algorithm: s.algorithm.clone(),
                point,
            })
        })
        .collect();

    let makespan = AxisDomain::covering(flattened.iter().map(|t| t.point.makespan));
    let tec = AxisDomain::covering(flattened.iter().map(|t| t.point.tec));

    AggregatedFront {
        domain: ChartDomain {
            makespan: makespan.unwrap_or(empty),
            tec: tec.unwrap_or(empty),
        },
        flattened,
    }
}

/// Check that labels are unique and every coordinate is finite.
pub fn validate(series: &[ParetoSeries]) -> Result<()> {
    if let Some(label) = series.iter().map(|s| &s.algorithm).duplicates().next() {
        return Err(Error::invalid(format!("duplicate series label '{}'", label)));
    }

    for s in series {
        if let Some(p) = s.points.iter().find(|p| !p.is_finite()) {
            return Err(Error::invalid(format!(
                "series '{}' has a non-finite point ({}, {})",
                s.algorithm, p.makespan, p.tec
            )));
        }
    }

    Ok(())
}

/// Validate, then aggregate.
pub fn aggregate_checked(series: &[ParetoSeries]) -> Result<AggregatedFront> {
    validate(series)?;
    Ok(aggregate(series))
}

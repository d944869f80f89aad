//! View state recomputed whenever the configuration key changes.
//!
//! A caller announces every selection change with [`ResultsSession::request`]
//! and hands the loaded data back with [`ResultsSession::resolve`]. Only the
//! most recent request may update the view; anything older is discarded, so a
//! slow load for a previous selection never overwrites a newer one.

use std::collections::BTreeSet;
use std::fmt;

use log::{debug, info, warn};

use crate::config::Config;
use crate::data::DataSource;
use crate::error::{Error, Result};
use crate::instance::InstanceKey;
use crate::metrics::{MetricKind, MetricTable, MetricsRecord};
use crate::pareto::{aggregate_with, validate, AggregatedFront, ChartDomain, ParetoSeries};

/// Everything that identifies what is on screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigKey {
    pub instance: InstanceKey,
    pub scenario: String,
    pub metaheuristic: String,
}

impl ConfigKey {
    /// Metaheuristic selector that keeps every algorithm.
    pub const ALL: &'static str = "all";

    pub fn new(
        instance: InstanceKey,
        scenario: impl Into<String>,
        metaheuristic: impl Into<String>,
    ) -> Self {
        ConfigKey {
            instance,
            scenario: scenario.into(),
            metaheuristic: metaheuristic.into(),
        }
    }

    /// Whether a series or metrics column labelled `label` belongs to the
    /// selected metaheuristic. Profile variants such as `HNSGA-II-6CW` belong
    /// to their base algorithm.
    pub fn selects(&self, label: &str) -> bool {
        let m = self.metaheuristic.as_str();
        m.eq_ignore_ascii_case(Self::ALL)
            || label == m
            || label
                .strip_prefix(m)
                .map_or(false, |rest| rest.starts_with('-'))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}/{}", self.instance, self.scenario, self.metaheuristic)
    }
}

/// Handle of one outstanding load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    key: ConfigKey,
}

impl Ticket {
    pub fn key(&self) -> &ConfigKey {
        &self.key
    }
}

/// Data a load produced for one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedResults {
    pub series: Vec<ParetoSeries>,
    pub metrics: Vec<MetricsRecord>,
}

/// Everything the presentation layer needs to draw one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub key: ConfigKey,
    pub series: Vec<ParetoSeries>,
    pub front: AggregatedFront,
    /// Front domain with the configured chart padding applied
    pub chart_domain: ChartDomain,
    pub table: Option<MetricTable>,
    pub best_cells: Vec<(MetricKind, BTreeSet<usize>)>,
}

impl ResultsView {
    fn build(key: ConfigKey, results: LoadedResults, config: &Config) -> Result<Self> {
        validate(&results.series)?;
        let front = aggregate_with(&results.series, config.empty_domain);
        let chart_domain = front
            .domain
            .padded(config.domain_lower_padding, config.domain_upper_padding);

        let (table, best_cells) = if results.metrics.is_empty() {
            (None, Vec::new())
        } else {
            let table = MetricTable::from_records(&results.metrics)?;
            let best = table.best_cells()?;
            (Some(table), best)
        };

        Ok(ResultsView {
            key,
            series: results.series,
            front,
            chart_domain,
            table,
            best_cells,
        })
    }
}

/// What the presentation layer should show.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading(ConfigKey),
    Ready(ResultsView),
    Failed { key: ConfigKey, message: String },
}

/// Outcome of handing a finished load back to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

/// Owns the current view and resolves overlapping loads, last write wins.
#[derive(Debug)]
pub struct ResultsSession {
    config: Config,
    generation: u64,
    /// Generation of the last applied ticket
    settled: u64,
    state: ViewState,
}

impl ResultsSession {
    pub fn new(config: Config) -> Self {
        ResultsSession {
            config,
            generation: 0,
            settled: 0,
            state: ViewState::Idle,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The ready view, if any.
    pub fn view(&self) -> Option<&ResultsView> {
        match &self.state {
            ViewState::Ready(view) => Some(view),
            _ => None,
        }
    }

    /// Start a load for `key`, superseding every earlier ticket.
    pub fn request(&mut self, key: ConfigKey) -> Ticket {
        self.generation += 1;
        debug!("request #{} for {}", self.generation, key);
        self.state = ViewState::Loading(key.clone());
        Ticket {
            generation: self.generation,
            key,
        }
    }

    /// True while `ticket` is the latest request and has not been resolved yet.
    pub fn is_current(&self, ticket: &Ticket) -> bool {
        ticket.generation == self.generation && ticket.generation > self.settled
    }

    /// Apply a finished load if its ticket is still the latest.
    ///
    /// Each ticket applies at most once; resolving it again is stale. A failed
    /// load, or one whose data is inconsistent, leaves the session in
    /// `Failed`; no partial view is ever published.
    pub fn resolve(&mut self, ticket: Ticket, outcome: Result<LoadedResults>) -> Resolution {
        if !self.is_current(&ticket) {
            debug!(
                "discarding stale result #{} for {} (current #{}, settled #{})",
                ticket.generation, ticket.key, self.generation, self.settled
            );
            return Resolution::Stale;
        }
        self.settled = ticket.generation;

        let key = ticket.key;
        self.state = match outcome.and_then(|r| ResultsView::build(key.clone(), r, &self.config)) {
            Ok(view) => {
                info!(
                    "{}: {} series, {} points",
                    key,
                    view.series.len(),
                    view.front.flattened.len()
                );
                ViewState::Ready(view)
            }
            Err(e) => {
                warn!("{}: {}", key, e);
                ViewState::Failed {
                    key,
                    message: e.to_string(),
                }
            }
        };
        Resolution::Applied
    }

    /// Request, load and resolve `key` in one step.
    pub fn refresh<D: DataSource + ?Sized>(&mut self, source: &D, key: ConfigKey) -> &ViewState {
        let ticket = self.request(key);
        let outcome = load(source, ticket.key(), &self.config);
        self.resolve(ticket, outcome);
        &self.state
    }
}

/// Load fronts and metrics for a configuration.
///
/// The `sensitivity` scenario compares the HNSGA-II front and metrics across
/// price profiles; every other scenario loads all algorithms under the
/// configured profile. Series and metrics columns are then narrowed to the
/// key's metaheuristic.
pub fn load<D: DataSource + ?Sized>(
    source: &D,
    key: &ConfigKey,
    config: &Config,
) -> Result<LoadedResults> {
    let (series, metrics) = if key.scenario == "sensitivity" {
        (
            source.load_sensitivity(key.instance)?,
            source.load_sensitivity_metrics(key.instance)?,
        )
    } else {
        (
            source.load_pareto(key.instance, config.price_profile)?,
            source.load_metrics(key.instance)?,
        )
    };

    let series: Vec<ParetoSeries> = series
        .into_iter()
        .filter(|s| key.selects(&s.algorithm))
        .collect();
    if series.is_empty() {
        return Err(Error::EmptyDataset(format!(
            "no {} fronts for {}",
            key.metaheuristic, key.instance
        )));
    }
    let metrics = metrics
        .into_iter()
        .filter(|r| key.selects(&r.algorithm))
        .collect();

    Ok(LoadedResults { series, metrics })
}

//! # flowshop_results
//!
//! Loading, aggregation and ranking of the published results of a
//! multi-objective energy-aware flow-shop scheduling study.
//!
//! Two objectives are traded off throughout: the makespan (completion time of
//! the last job) and the total energy cost (TEC) under time-of-use electricity
//! prices. The crate reads each metaheuristic's Pareto front and quality
//! metrics, merges the fronts into a plotting-ready set with a shared axis
//! domain, and marks the best value of every metric row.
//!
//! ```
//! use flowshop_results::pareto::{aggregate, ParetoPoint, ParetoSeries};
//! use flowshop_results::metrics::{best_indices, Direction};
//!
//! let front = aggregate(&[
//!     ParetoSeries::new("A", vec![ParetoPoint::new(100.0, 200.0)]),
//!     ParetoSeries::new("B", vec![ParetoPoint::new(110.0, 190.0)]),
//! ]);
//! assert_eq!(front.flattened.len(), 2);
//! assert_eq!(front.domain.tec.min, 190.0);
//!
//! let best = best_indices(&[0.01, 0.02, 0.004], Direction::Minimize).unwrap();
//! assert!(best.contains(&2));
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod instance;
pub mod metrics;
pub mod pareto;
pub mod session;
pub mod utils;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::instance::{InstanceKey, PriceProfile};
pub use crate::metrics::{best_indices, Direction, MetricKind, MetricRow};
pub use crate::pareto::{aggregate, AggregatedFront, AxisDomain, ParetoPoint, ParetoSeries};
pub use crate::session::{ConfigKey, ResultsSession, ViewState};

use crate::data::{DataSource, FallbackDataSource, FileDataSource, MockDataSource};

/// Data source described by a configuration: the data directory, optionally
/// backed by generated fixtures.
pub fn source_for(config: &Config) -> Box<dyn DataSource> {
    let files = FileDataSource::new(config.data_dir.clone());
    if config.mock_fallback {
        Box::new(FallbackDataSource::new(files, MockDataSource))
    } else {
        Box::new(files)
    }
}

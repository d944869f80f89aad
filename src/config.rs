//! Configuration parameters for loading and presenting results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::instance::PriceProfile;
use crate::pareto::AxisDomain;

/// Configuration settings for a results session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory holding the result files
    pub data_dir: PathBuf,
    /// Electricity price profile the Pareto fronts were computed under
    pub price_profile: PriceProfile,
    /// Factor applied to the lower bound of each chart axis
    pub domain_lower_padding: f64,
    /// Factor applied to the upper bound of each chart axis
    pub domain_upper_padding: f64,
    /// Domain used on both axes when there is no point to plot
    pub empty_domain: AxisDomain,
    /// Fall back to generated fixtures when the files cannot be read
    pub mock_fallback: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from("DATA"),
            price_profile: PriceProfile::Cw,
            domain_lower_padding: 1.0,
            domain_upper_padding: 1.0,
            empty_domain: AxisDomain::PLACEHOLDER,
            mock_fallback: true,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the price profile.
    pub fn with_price_profile(mut self, profile: PriceProfile) -> Self {
        self.price_profile = profile;
        self
    }

    /// Set the chart padding factors (the result pages use 0.95 and 1.05).
    pub fn with_domain_padding(mut self, lower: f64, upper: f64) -> Self {
        self.domain_lower_padding = lower;
        self.domain_upper_padding = upper;
        self
    }

    /// Set the placeholder domain for empty charts.
    pub fn with_empty_domain(mut self, domain: AxisDomain) -> Self {
        self.empty_domain = domain;
        self
    }

    /// Enable or disable the mock fallback.
    pub fn with_mock_fallback(mut self, enabled: bool) -> Self {
        self.mock_fallback = enabled;
        self
    }
}

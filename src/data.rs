//! Sources of Pareto fronts, metrics and processing times.
//!
//! Results come either from the study's data directory or from deterministic
//! generators used when the files are missing. Callers receive complete,
//! validated collections or an error, never a partial set.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{Error, Result};
use crate::instance::{InstanceKey, PriceProfile, ProcessingTimes};
use crate::metrics::MetricsRecord;
use crate::pareto::{ParetoPoint, ParetoSeries};

/// Metaheuristics whose fronts are published per instance.
pub const ALGORITHMS: [&str; 3] = ["HNSGA-II", "HMOGVNS", "HMOSA"];

/// Supplies result data for a benchmark instance.
pub trait DataSource {
    /// Non-dominated front of every available algorithm.
    fn load_pareto(&self, key: InstanceKey, profile: PriceProfile) -> Result<Vec<ParetoSeries>>;

    /// Metrics records of the instance, one per algorithm.
    fn load_metrics(&self, key: InstanceKey) -> Result<Vec<MetricsRecord>>;

    fn load_processing_times(&self, key: InstanceKey) -> Result<ProcessingTimes>;

    /// HNSGA-II front under every price profile, labelled `HNSGA-II-{profile}`.
    fn load_sensitivity(&self, key: InstanceKey) -> Result<Vec<ParetoSeries>> {
        let mut result = Vec::new();
        for profile in PriceProfile::ALL {
            let fronts = match self.load_pareto(key, profile) {
                Ok(fronts) => fronts,
                Err(Error::EmptyDataset(msg)) => {
                    warn!("skipping profile {}: {}", profile, msg);
                    continue;
                }
                Err(e) => return Err(e),
            };
            if let Some(s) = fronts.into_iter().find(|s| s.algorithm == "HNSGA-II") {
                result.push(ParetoSeries::new(format!("HNSGA-II-{}", profile), s.points));
            }
        }

        if result.is_empty() {
            return Err(Error::EmptyDataset(format!("no sensitivity fronts for {}", key)));
        }
        Ok(result)
    }

    /// Metrics of the HNSGA-II price-profile variants, in [`SENSITIVITY_VARIANTS`] order.
    ///
    /// Sources without tariff-profile results have none.
    fn load_sensitivity_metrics(&self, _key: InstanceKey) -> Result<Vec<MetricsRecord>> {
        Ok(Vec::new())
    }
}

/// Column order of the tariff-profile comparison.
pub const SENSITIVITY_VARIANTS: [&str; 3] = ["HNSGA-II-6CW", "HNSGA-II-6CWI", "HNSGA-II-6CWD"];

/// Keep the variant rows of `key`, ordered by [`SENSITIVITY_VARIANTS`].
///
/// The tariff results carry no GD column, so it is zeroed.
pub fn select_variants(records: Vec<MetricsRecord>, key: InstanceKey) -> Vec<MetricsRecord> {
    let rank = |r: &MetricsRecord| SENSITIVITY_VARIANTS.iter().position(|v| *v == r.algorithm);

    let mut selected: Vec<MetricsRecord> = records
        .into_iter()
        .filter(|r| r.key() == key && rank(r).is_some())
        .map(|r| MetricsRecord { gd: 0.0, ..r })
        .collect();
    selected.sort_by_key(|r| rank(r));
    selected
}

/// A raw line of a Pareto result file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResultPoint {
    pub point: ParetoPoint,
    pub pareto: bool,
    pub execution_time: f64,
}

/// Parse a Pareto CSV file: a header row, then `makespan,tec,pareto,exec_time`.
pub fn read_result_points<P: AsRef<Path>>(path: P) -> Result<Vec<ResultPoint>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);

    let mut points = Vec::new();
    for (i, line_result) in reader.lines().enumerate().skip(1) {
        let line = line_result.map_err(|e| Error::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        points.push(parse_result_line(&line).map_err(|msg| Error::parse(path, i + 1, msg))?);
    }

    Ok(points)
}

fn parse_result_line(line: &str) -> std::result::Result<ResultPoint, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 4 {
        return Err(format!("expected 4 fields, found {}", fields.len()));
    }

    let number = |s: &str| s.parse::<f64>().map_err(|e| format!("'{}': {}", s, e));

    Ok(ResultPoint {
        point: ParetoPoint::new(number(fields[0])?, number(fields[1])?),
        pareto: fields[2].eq_ignore_ascii_case("true"),
        execution_time: number(fields[3])?,
    })
}

/// Parse a JSON array of metrics records.
pub fn read_metrics_file<P: AsRef<Path>>(path: P) -> Result<Vec<MetricsRecord>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Keep the rows flagged as Pareto and drop any that are still dominated.
pub fn pareto_front(points: &[ResultPoint]) -> Vec<ParetoPoint> {
    let flagged: Vec<ParetoPoint> = points.iter().filter(|p| p.pareto).map(|p| p.point).collect();
    crate::pareto::non_dominated(&flagged)
}

/// Reads results from the study's data directory.
#[derive(Debug, Clone)]
pub struct FileDataSource {
    root: PathBuf,
}

impl FileDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileDataSource { root: root.into() }
    }

    /// Location of an algorithm's front for an instance.
    ///
    /// Each algorithm's result set numbers its instances differently.
    pub fn pareto_path(
        &self,
        algorithm: &str,
        key: InstanceKey,
        profile: PriceProfile,
    ) -> Option<PathBuf> {
        let (folder, index) = match algorithm {
            "HNSGA-II" => ("NSGA_Pareto_rate1", key.instance as i64),
            "HMOGVNS" => ("VNS_Pareto_rate1", key.instance as i64 - 1),
            "HMOSA" => ("SA_Pareto_rate1", (key.instance % 10) as i64),
            _ => return None,
        };
        let file = format!(
            "M{}_J{}_config_{}_{}.csv",
            key.machines, key.jobs, profile, index
        );
        Some(self.root.join(folder).join(file))
    }

    pub fn metrics_path(&self) -> PathBuf {
        self.root.join("MH_comparison").join("metrics_results.json")
    }

    pub fn sensitivity_metrics_path(&self) -> PathBuf {
        self.root
            .join("DATA_page")
            .join("Sensitivity_analysis")
            .join("Tariff_profile_metrics.json")
    }

    pub fn processing_times_path(&self, key: InstanceKey) -> PathBuf {
        self.root.join("new_data").join(format!(
            "VFR{}_{}_{}_Gap.txt",
            key.jobs, key.machines, key.instance
        ))
    }
}

impl DataSource for FileDataSource {
    fn load_pareto(&self, key: InstanceKey, profile: PriceProfile) -> Result<Vec<ParetoSeries>> {
        let mut result = Vec::new();

        for algorithm in ALGORITHMS {
            let Some(path) = self.pareto_path(algorithm, key, profile) else {
                continue;
            };
            match read_result_points(&path) {
                Ok(points) => {
                    let front = pareto_front(&points);
                    debug!(
                        "{}: {} of {} points non-dominated",
                        algorithm,
                        front.len(),
                        points.len()
                    );
                    result.push(ParetoSeries::new(algorithm, front));
                }
                Err(e) if e.is_not_found() => {
                    warn!("no {} front for {} ({})", algorithm, key, path.display());
                }
                Err(e) => return Err(e),
            }
        }

        if result.is_empty() {
            return Err(Error::EmptyDataset(format!("no Pareto fronts for {}", key)));
        }
        Ok(result)
    }

    fn load_metrics(&self, key: InstanceKey) -> Result<Vec<MetricsRecord>> {
        let all = read_metrics_file(self.metrics_path())?;

        let filtered: Vec<MetricsRecord> = all.into_iter().filter(|r| r.key() == key).collect();
        debug!("{} metrics records for {}", filtered.len(), key);
        Ok(filtered)
    }

    /// Reads the tariff-profile metrics. Without that file, the rows of the
    /// two J10_M5 instances in the general metrics file are searched instead.
    fn load_sensitivity_metrics(&self, key: InstanceKey) -> Result<Vec<MetricsRecord>> {
        let path = self.sensitivity_metrics_path();
        let records = match read_metrics_file(&path) {
            Ok(records) => records,
            Err(e) if e.is_not_found() => {
                warn!("no tariff profile metrics at {}", path.display());
                let mut fallback = Vec::new();
                for instance in 1..=2 {
                    fallback.extend(self.load_metrics(InstanceKey::new(10, 5, instance))?);
                }
                fallback
            }
            Err(e) => return Err(e),
        };

        let selected = select_variants(records, key);
        debug!("{} tariff profile records for {}", selected.len(), key);
        Ok(selected)
    }

    fn load_processing_times(&self, key: InstanceKey) -> Result<ProcessingTimes> {
        ProcessingTimes::from_file(self.processing_times_path(key), key)
    }
}

/// Deterministic fixtures shaped like the published results.
#[derive(Debug, Clone, Default)]
pub struct MockDataSource;

impl MockDataSource {
    /// Synthetic front of 20 points, perturbed with sine and cosine.
    pub fn mock_series(algorithm: &str, seed: f64, bias: f64) -> ParetoSeries {
        let round2 = |v: f64| (v * 100.0).round() / 100.0;
        let points = (0..20)
            .map(|i| {
                let i = i as f64;
                ParetoPoint::new(
                    round2(120.0 + seed * 7.0 + i * (3.0 + bias) + (i + seed).sin()),
                    round2(60.0 + seed * 4.0 + (20.0 - i) * (2.3 - bias * 0.3) + (i + seed).cos()),
                )
            })
            .collect();
        ParetoSeries::new(algorithm, points)
    }

    pub fn mock_metrics(key: InstanceKey) -> Vec<MetricsRecord> {
        let inst = key.instance as f64;
        let base_igd = 0.005 + inst * 0.002;
        let base_gd = 1.5 + inst * 0.5;
        let base_sns = 0.79 - inst * 0.01;
        let base_nps = 90.0 + inst * 5.0;
        let base_exec = 3.0 + inst;

        ["HNSGA-II", "HMOSA", "HMOVNS"]
            .iter()
            .enumerate()
            .map(|(index, algorithm)| {
                let i = index as f64;
                MetricsRecord {
                    instance: key.instance,
                    machines: key.machines,
                    jobs: key.jobs,
                    algorithm: algorithm.to_string(),
                    igd: base_igd + i * 0.005,
                    gd: base_gd + i * 2.0,
                    sns: base_sns - i * 0.02,
                    nps: base_nps - i * 20.0,
                    exec_time: base_exec + i * 2.0,
                }
            })
            .collect()
    }

    /// Mock metrics relabelled as the price-profile variants.
    pub fn mock_sensitivity_metrics(key: InstanceKey) -> Vec<MetricsRecord> {
        let records = Self::mock_metrics(key)
            .into_iter()
            .zip(SENSITIVITY_VARIANTS)
            .map(|(r, variant)| MetricsRecord {
                algorithm: variant.to_string(),
                ..r
            })
            .collect();
        select_variants(records, key)
    }
}

impl DataSource for MockDataSource {
    fn load_pareto(&self, _key: InstanceKey, _profile: PriceProfile) -> Result<Vec<ParetoSeries>> {
        Ok(vec![
            Self::mock_series("HNSGA-II", 1.0, 0.1),
            Self::mock_series("HMOGVNS", 2.0, 0.0),
            Self::mock_series("HMOSA", 3.0, -0.1),
        ])
    }

    fn load_metrics(&self, key: InstanceKey) -> Result<Vec<MetricsRecord>> {
        Ok(Self::mock_metrics(key))
    }

    fn load_sensitivity_metrics(&self, key: InstanceKey) -> Result<Vec<MetricsRecord>> {
        Ok(Self::mock_sensitivity_metrics(key))
    }

    fn load_processing_times(&self, key: InstanceKey) -> Result<ProcessingTimes> {
        Ok(ProcessingTimes::mock(key))
    }
}

/// Tries `primary` and falls back to `secondary` when it fails.
#[derive(Debug, Clone)]
pub struct FallbackDataSource<P, S> {
    primary: P,
    secondary: S,
}

impl<P: DataSource, S: DataSource> FallbackDataSource<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        FallbackDataSource { primary, secondary }
    }

    fn or_fallback<T>(
        &self,
        what: &str,
        primary: Result<T>,
        secondary: impl FnOnce(&S) -> Result<T>,
    ) -> Result<T> {
        primary.or_else(|e| {
            warn!("{} unavailable ({}), using fallback", what, e);
            secondary(&self.secondary)
        })
    }
}

impl<P: DataSource, S: DataSource> DataSource for FallbackDataSource<P, S> {
    fn load_pareto(&self, key: InstanceKey, profile: PriceProfile) -> Result<Vec<ParetoSeries>> {
        self.or_fallback(
            "Pareto fronts",
            self.primary.load_pareto(key, profile),
            |s| s.load_pareto(key, profile),
        )
    }

    /// Falls back only when the primary cannot be read; an instance the
    /// primary simply has no rows for stays empty.
    fn load_metrics(&self, key: InstanceKey) -> Result<Vec<MetricsRecord>> {
        self.or_fallback("metrics", self.primary.load_metrics(key), |s| {
            s.load_metrics(key)
        })
    }

    fn load_sensitivity_metrics(&self, key: InstanceKey) -> Result<Vec<MetricsRecord>> {
        self.or_fallback(
            "tariff profile metrics",
            self.primary.load_sensitivity_metrics(key),
            |s| s.load_sensitivity_metrics(key),
        )
    }

    fn load_processing_times(&self, key: InstanceKey) -> Result<ProcessingTimes> {
        self.or_fallback(
            "processing times",
            self.primary.load_processing_times(key),
            |s| s.load_processing_times(key),
        )
    }
}

/// Quality value of an algorithm sampled every 50 iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceCurve {
    pub algorithm: String,
    /// `(iteration, value)` pairs
    pub samples: Vec<(u32, f64)>,
}

/// Synthetic convergence curves: logarithmic decay plus seeded noise.
pub fn mock_convergence(seed: u64) -> Vec<ConvergenceCurve> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let shapes = [
        ("HNSGA-II", 100.0, 15.0, 5.0),
        ("HMOGVNS", 95.0, 12.0, 7.0),
        ("HMOSA", 98.0, 13.0, 6.0),
    ];

    shapes
        .iter()
        .map(|&(algorithm, start, decay, noise)| {
            let samples = (0..20u32)
                .map(|i| {
                    let value = start - ((i + 1) as f64).ln() * decay + rng.gen::<f64>() * noise;
                    (i * 50, value)
                })
                .collect();
            ConvergenceCurve {
                algorithm: algorithm.to_string(),
                samples,
            }
        })
        .collect()
}

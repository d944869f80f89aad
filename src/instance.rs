//! Benchmark instance identity, electricity price profiles and processing times.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Identifies a benchmark instance by its size and index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceKey {
    pub jobs: u32,
    pub machines: u32,
    pub instance: u32,
}

impl InstanceKey {
    pub fn new(jobs: u32, machines: u32, instance: u32) -> Self {
        InstanceKey {
            jobs,
            machines,
            instance,
        }
    }
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "J{}_M{}_I{}", self.jobs, self.machines, self.instance)
    }
}

/// Time-of-use electricity price profile with six pricing periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceProfile {
    /// Standard profile
    #[serde(rename = "6CW")]
    Cw,
    /// Decreasing variant
    #[serde(rename = "6CWD")]
    Cwd,
    /// Increasing variant
    #[serde(rename = "6CWI")]
    Cwi,
}

impl PriceProfile {
    pub const ALL: [PriceProfile; 3] = [PriceProfile::Cw, PriceProfile::Cwd, PriceProfile::Cwi];

    /// Suffix used in result file names.
    pub fn code(self) -> &'static str {
        match self {
            PriceProfile::Cw => "6CW",
            PriceProfile::Cwd => "6CWD",
            PriceProfile::Cwi => "6CWI",
        }
    }

    /// Electricity price of each period.
    pub fn prices(self) -> [f64; 6] {
        match self {
            PriceProfile::Cw => [0.08, 0.12, 0.08, 0.12, 0.08, 0.04],
            PriceProfile::Cwd => [0.12, 0.08, 0.04, 0.08, 0.12, 0.08],
            PriceProfile::Cwi => [0.04, 0.08, 0.12, 0.08, 0.12, 0.08],
        }
    }
}

impl fmt::Display for PriceProfile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PriceProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PriceProfile::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid(format!("unknown price profile '{}'", s)))
    }
}

/// Processing time of every job on every machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingTimes {
    pub key: InstanceKey,
    /// `times[job][machine]`
    pub times: Vec<Vec<u32>>,
}

impl ProcessingTimes {
    /// Price table of every profile, as shown next to the processing times.
    pub fn energy_prices(&self) -> [(PriceProfile, [f64; 6]); 3] {
        PriceProfile::ALL.map(|p| (p, p.prices()))
    }

    pub fn get(&self, job: usize, machine: usize) -> Option<u32> {
        self.times.get(job).and_then(|row| row.get(machine)).copied()
    }

    /// Total processing time of a job over all machines.
    pub fn job_total(&self, job: usize) -> u32 {
        self.times.get(job).map(|row| row.iter().sum()).unwrap_or(0)
    }

    /// Deterministic fixture used when no instance file is available.
    ///
    /// Time of `job` on `machine` is `(jobs * machines * instance + job + machine) % 20 + 5`,
    /// evaluated modulo 20 throughout so no instance size can overflow.
    pub fn mock(key: InstanceKey) -> Self {
        let seed = (key.jobs % 20) * (key.machines % 20) % 20 * (key.instance % 20) % 20;
        let times = (0..key.jobs)
            .map(|job| {
                (0..key.machines)
                    .map(|machine| (seed + job % 20 + machine % 20) % 20 + 5)
                    .collect()
            })
            .collect();

        ProcessingTimes { key, times }
    }

    /// Load processing times from a `VFR{j}_{m}_{i}_Gap.txt` file.
    ///
    /// The first line holds the total horizon; every following non-empty line
    /// lists `machine time` pairs for one job. Machines outside the instance
    /// are ignored and missing ones stay at zero.
    pub fn from_file<P: AsRef<Path>>(path: P, key: InstanceKey) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        // Header holds the horizon, which is not needed here
        match lines.next() {
            Some(line) => {
                line.map_err(|e| Error::io(path, e))?;
            }
            None => return Err(Error::parse(path, 1, "missing header line")),
        }

        let machines = key.machines as usize;
        let mut times = Vec::new();

        for (i, line_result) in lines.enumerate() {
            let line = line_result.map_err(|e| Error::io(path, e))?;
            let line_no = i + 2;
            if line.trim().is_empty() {
                continue;
            }

            let values = line
                .split_whitespace()
                .map(|v| v.parse::<u32>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| Error::parse(path, line_no, e.to_string()))?;

            if values.len() % 2 != 0 {
                return Err(Error::parse(path, line_no, "odd number of values"));
            }

            let mut row = vec![0; machines];
            for pair in values.chunks(2) {
                let (machine, time) = (pair[0] as usize, pair[1]);
                if machine < machines {
                    row[machine] = time;
                }
            }
            times.push(row);
        }

        Ok(ProcessingTimes { key, times })
    }
}

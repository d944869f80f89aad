//! Command-line viewer for flow-shop scheduling results.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use log::{error, info};

use flowshop_results::data::MockDataSource;
use flowshop_results::utils::{format_duration, format_metrics_table, render_front, save_report};
use flowshop_results::{
    source_for, Config, ConfigKey, InstanceKey, PriceProfile, ResultsSession, ViewState,
};

#[derive(Debug, Parser)]
#[command(
    name = "flowshop-results",
    about = "Compare Pareto fronts and metrics of the flow-shop metaheuristics"
)]
struct Args {
    /// Number of jobs of the instance
    #[arg(short, long, default_value_t = 30)]
    jobs: u32,

    /// Number of machines of the instance
    #[arg(short, long, default_value_t = 10)]
    machines: u32,

    /// Instance index
    #[arg(short, long, default_value_t = 1)]
    instance: u32,

    /// Directory holding the result files
    #[arg(short, long, default_value = "DATA")]
    data_dir: PathBuf,

    /// Electricity price profile (6CW, 6CWD or 6CWI)
    #[arg(short, long, default_value = "6CW")]
    profile: PriceProfile,

    /// Scenario to show ("sensitivity" compares price profiles)
    #[arg(long, default_value = "comparison")]
    scenario: String,

    /// Metaheuristic to show ("all" keeps every algorithm)
    #[arg(long, default_value = ConfigKey::ALL)]
    metaheuristic: String,

    /// Use generated data only
    #[arg(long)]
    mock: bool,

    /// Disable the fallback to generated data
    #[arg(long)]
    no_fallback: bool,

    /// Pad chart axes by 5% on each side
    #[arg(long)]
    padding: bool,

    /// Print an ASCII plot of the fronts
    #[arg(long)]
    plot: bool,

    /// Write a text report to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut config = Config::new()
        .with_data_dir(&args.data_dir)
        .with_price_profile(args.profile)
        .with_mock_fallback(!args.no_fallback);
    if args.padding {
        config = config.with_domain_padding(0.95, 1.05);
    }

    let key = ConfigKey::new(
        InstanceKey::new(args.jobs, args.machines, args.instance),
        args.scenario.clone(),
        args.metaheuristic.clone(),
    );

    let start = Instant::now();
    let mut session = ResultsSession::new(config.clone());
    if args.mock {
        session.refresh(&MockDataSource, key);
    } else {
        let source = source_for(&config);
        session.refresh(source.as_ref(), key);
    }
    info!("loaded in {}", format_duration(start.elapsed()));

    let view = match session.state() {
        ViewState::Ready(view) => view,
        ViewState::Failed { key, message } => {
            error!("no data available for {}: {}", key, message);
            return ExitCode::FAILURE;
        }
        ViewState::Idle | ViewState::Loading(_) => return ExitCode::FAILURE,
    };

    match &view.table {
        Some(table) => match format_metrics_table(table) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => println!("No metrics data available for this configuration"),
    }

    for series in &view.series {
        println!("{}: {} non-dominated points", series.algorithm, series.len());
    }

    if args.plot {
        println!();
        print!("{}", render_front(&view.front, 72, 20));
    }

    if let Some(path) = &args.output {
        if let Err(e) = save_report(view, path) {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
        info!("report written to {}", path.display());
    }

    ExitCode::SUCCESS
}

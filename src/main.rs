mod config;
mod model;
mod payoff;
mod runner;
mod sampler;
mod scorer;
mod stats;

use crate::model::ParamSet;
use crate::runner::Runner;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::{io::Write, path::PathBuf};

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML configuration file (defaults are used if absent).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sample parameters and summarize the optimal spending shares.
    Simulate {
        #[arg(long)]
        n_trials: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Evaluate the expected payoff over a grid of spending shares.
    Payoff,

    /// Compute the optimal spending share of a single calibration.
    Score {
        /// Baseline extinction risk in percent.
        #[arg(long, value_parser = parse_in_range(0.0, 2.0))]
        delta0_pct: f64,

        /// Fraction of the risk that can be mitigated.
        #[arg(long, value_parser = parse_in_range(0.0, 1.0))]
        phi: f64,

        /// Mitigation effectiveness.
        #[arg(long, value_parser = parse_in_range(0.0, 0.99))]
        xi: f64,

        #[arg(long, default_value_t = 180.0)]
        value_of_life: f64,

        #[arg(long, default_value_t = 10.0)]
        period: f64,
    },

    /// Print the effective configuration.
    Calibration,
}

fn parse_in_range(min: f64, max: f64) -> impl Fn(&str) -> Result<f64, String> + Clone {
    move |arg: &str| {
        let val: f64 = arg.parse().map_err(|error| format!("{error}"))?;
        if !(min..=max).contains(&val) {
            return Err(format!("must be in the range {min}..={max}, but is {val}"));
        }
        Ok(val)
    }
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let runner = Runner::from_file(args.config.as_ref()).context("failed to construct runner")?;

    match args.command {
        Command::Simulate { n_trials, seed } => {
            let report = runner.run_simulation(n_trials, seed)?;
            print_json(&report)?;
        }
        Command::Payoff => {
            let report = runner.run_payoff()?;
            print_json(&report)?;
        }
        Command::Score {
            delta0_pct,
            phi,
            xi,
            value_of_life,
            period,
        } => {
            let params = ParamSet {
                delta0: delta0_pct / 100.0,
                phi,
                xi,
                value_of_life,
                period,
            };
            let report = runner.run_score(params)?;
            print_json(&report)?;
        }
        Command::Calibration => print_json(runner.cfg())?,
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("failed to serialize report")?;
    writeln!(stdout).context("failed to write to stdout")?;
    Ok(())
}

//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::csv_adapter::{read_candidates, CsvAdapter};
use crate::adapters::csv_order_sink::CsvOrderSink;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::candidate::Candidate;
use crate::domain::config_validation::{
    parse_session_date, read_count, read_flag, validate_rebalance_config,
};
use crate::domain::error::CountertrendError;
use crate::domain::execution::equal_weight;
use crate::domain::rebalance::{
    run_rebalance, RebalanceConfig, RebalancePorts, DEFAULT_LOOKBACK_DAYS, DEFAULT_TOP_N,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::ranking_port::RankingPort;

#[derive(Parser, Debug)]
#[command(
    name = "countertrend",
    about = "Intraday counter-trend rebalance decisions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rank instruments by trailing return and print the winners
    Rank {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Run one rebalance and write the resulting orders
    Decide {
        #[arg(short, long)]
        config: PathBuf,
        /// Use this candidate list (rank,code,score) instead of ranking
        #[arg(long)]
        candidates: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Rank { config, top_n } => run_rank(&config, top_n),
        Command::Decide {
            config,
            candidates,
            output,
        } => run_decide(&config, candidates.as_deref(), output.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: &CountertrendError) -> ExitCode {
    error!("{err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, CountertrendError> {
    info!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

pub fn build_rebalance_config(adapter: &dyn ConfigPort) -> Result<RebalanceConfig, CountertrendError> {
    let session_date =
        parse_session_date(adapter.get_string("rebalance", "session_date").as_deref())?;

    let top_n = read_count(adapter, "rebalance", "top_n", DEFAULT_TOP_N)?;
    let lookback_days = read_count(adapter, "rebalance", "lookback_days", DEFAULT_LOOKBACK_DAYS)?;
    let target_weight = adapter.get_double("rebalance", "target_weight", equal_weight(top_n));

    Ok(RebalanceConfig {
        session_date,
        top_n,
        lookback_days,
        target_weight,
    })
}

pub fn resolve_base_path(adapter: &dyn ConfigPort) -> Result<PathBuf, CountertrendError> {
    adapter
        .get_string("data", "base_path")
        .map(|s| PathBuf::from(s.trim()))
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| CountertrendError::ConfigMissing {
            section: "data".into(),
            key: "base_path".into(),
        })
}

fn prepare(config_path: &Path) -> Result<(FileConfigAdapter, RebalanceConfig, CsvAdapter), CountertrendError> {
    let adapter = load_config(config_path)?;
    validate_rebalance_config(&adapter)?;
    let rebalance = build_rebalance_config(&adapter)?;
    let data = CsvAdapter::new(resolve_base_path(&adapter)?, rebalance.session_date);
    Ok((adapter, rebalance, data))
}

/// Rank winners and render them as `rank,code,score` CSV.
pub fn rank_to_csv(
    ranking: &dyn RankingPort,
    config: &RebalanceConfig,
) -> Result<String, CountertrendError> {
    let winners = ranking.rank(config.lookback_days, config.top_n)?;
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["rank", "code", "score"])
        .map_err(|e| CountertrendError::Source { reason: e.to_string() })?;
    for c in &winners {
        wtr.write_record([c.rank.to_string(), c.code.clone(), c.score.to_string()])
            .map_err(|e| CountertrendError::Source { reason: e.to_string() })?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| CountertrendError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn run_rank(config_path: &Path, top_n: Option<usize>) -> ExitCode {
    let (_, mut rebalance, data) = match prepare(config_path) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    if let Some(n) = top_n {
        rebalance.top_n = n.max(1);
    }

    info!(
        session = %rebalance.session_date,
        lookback = rebalance.lookback_days,
        top_n = rebalance.top_n,
        "ranking"
    );
    match rank_to_csv(&data, &rebalance) {
        Ok(out) => {
            print!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// Run one rebalance cycle against the CSV data directory and return the
/// rendered order CSV. Nothing is rendered when any step fails.
pub fn decide_to_csv(
    adapter: &dyn ConfigPort,
    rebalance: &RebalanceConfig,
    data: &CsvAdapter,
    candidates: Option<Vec<Candidate>>,
) -> Result<String, CountertrendError> {
    let include_holds = read_flag(adapter, "output", "include_holds", true)?;
    let mut sink = CsvOrderSink::new(Vec::new(), rebalance.target_weight).include_holds(include_holds);

    let ports = RebalancePorts {
        ranking: data,
        market: data,
        portfolio: data,
        registry: data,
    };
    run_rebalance(&ports, &mut sink, rebalance, candidates)?;

    let bytes = sink.into_inner()?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn run_decide(config_path: &Path, candidates_path: Option<&Path>, output: Option<&Path>) -> ExitCode {
    let (adapter, rebalance, data) = match prepare(config_path) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let candidates = match candidates_path {
        Some(path) => {
            info!("Reading candidates from {}", path.display());
            match read_candidates(path) {
                Ok(c) => Some(c),
                Err(e) => return fail(&e),
            }
        }
        None => None,
    };

    let rendered = match decide_to_csv(&adapter, &rebalance, &data, candidates) {
        Ok(r) => r,
        Err(e) => {
            error!("rebalance aborted, no orders written");
            return fail(&e);
        }
    };

    let written = match output {
        Some(path) => fs::write(path, &rendered).map(|()| {
            info!("Orders written to: {}", path.display());
        }),
        None => std::io::stdout().write_all(rendered.as_bytes()),
    };
    match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&CountertrendError::Io(e)),
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    match prepare(config_path) {
        Ok((_, rebalance, _)) => {
            info!(
                session = %rebalance.session_date,
                top_n = rebalance.top_n,
                lookback = rebalance.lookback_days,
                target_weight = rebalance.target_weight,
                "configuration is valid"
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

//! Rebalance run parameters and the once-per-session cycle.
//!
//! A cycle gathers winners, holdings and both price snapshots from the ports,
//! runs the decision engine, and hands the full decision list to the sink.
//! Nothing reaches the sink unless every step succeeded.

use chrono::NaiveDate;
use tracing::info;

use super::candidate::{Candidate, CandidateSet};
use super::decision::{Action, Decision};
use super::engine::RebalanceDecisionEngine;
use super::error::CountertrendError;
use super::execution::equal_weight;
use crate::ports::asset_registry::AssetRegistry;
use crate::ports::execution_port::ExecutionSink;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::portfolio_port::PortfolioPort;
use crate::ports::ranking_port::RankingPort;

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_LOOKBACK_DAYS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceConfig {
    /// Trading session being rebalanced.
    pub session_date: NaiveDate,
    /// Number of winners the ranking step keeps.
    pub top_n: usize,
    /// Sessions in the trailing-return window.
    pub lookback_days: usize,
    /// Target weight of each new entry.
    pub target_weight: f64,
}

impl RebalanceConfig {
    pub fn new(session_date: NaiveDate) -> Self {
        Self {
            session_date,
            top_n: DEFAULT_TOP_N,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            target_weight: equal_weight(DEFAULT_TOP_N),
        }
    }
}

/// Collaborators of one rebalance cycle.
pub struct RebalancePorts<'a> {
    pub ranking: &'a dyn RankingPort,
    pub market: &'a dyn MarketDataPort,
    pub portfolio: &'a dyn PortfolioPort,
    pub registry: &'a dyn AssetRegistry,
}

/// Run one cycle. `candidates` replaces the ranking step when supplied.
pub fn run_rebalance(
    ports: &RebalancePorts<'_>,
    sink: &mut dyn ExecutionSink,
    config: &RebalanceConfig,
    candidates: Option<Vec<Candidate>>,
) -> Result<Vec<Decision>, CountertrendError> {
    let candidates = match candidates {
        Some(c) => c,
        None => ports.ranking.rank(config.lookback_days, config.top_n)?,
    };
    let candidates = CandidateSet::new(candidates)?;
    let holdings = ports.portfolio.positions()?;

    info!(
        session = %config.session_date,
        candidates = candidates.len(),
        positions = holdings.position_count(),
        "rebalancing"
    );

    let mut codes: Vec<String> = holdings.codes().map(str::to_string).collect();
    for code in candidates.codes() {
        if !holdings.has_position(code) {
            codes.push(code.to_string());
        }
    }

    let prices_now = ports.market.prices_now(&codes)?;
    let prices_prior_close = ports.market.prices_prior_close(&codes)?;

    let engine = RebalanceDecisionEngine::new(ports.registry);
    let decisions = engine.decide(&candidates, &holdings, &prices_now, &prices_prior_close)?;

    let count = |action: Action| decisions.iter().filter(|d| d.action == action).count();
    info!(
        enter = count(Action::Enter),
        exit = count(Action::Exit),
        hold = count(Action::Hold),
        gross_exposure = holdings.gross_exposure(&prices_now),
        "decisions ready"
    );

    sink.submit(&decisions)?;
    Ok(decisions)
}

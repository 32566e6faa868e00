#![allow(dead_code)]

use countertrend::domain::candidate::{Candidate, CandidateSet};
use countertrend::domain::decision::{Action, Decision};
use countertrend::domain::error::CountertrendError;
use countertrend::domain::portfolio::Holdings;
use countertrend::domain::position::Position;
use countertrend::domain::snapshot::{PriceSnapshot, SnapshotKind};
use countertrend::ports::asset_registry::AssetRegistry;
use countertrend::ports::execution_port::ExecutionSink;
use countertrend::ports::market_data_port::MarketDataPort;
use countertrend::ports::portfolio_port::PortfolioPort;
use countertrend::ports::ranking_port::RankingPort;
use std::cell::Cell;
use std::collections::HashMap;

/// In-memory stand-in for every data-side port.
pub struct MockMarket {
    pub now: HashMap<String, f64>,
    pub prior: HashMap<String, f64>,
    pub winners: Vec<Candidate>,
    pub positions: Vec<Position>,
    pub unknown: Vec<String>,
    pub ranking_error: Option<String>,
    pub rank_calls: Cell<usize>,
}

impl MockMarket {
    pub fn new() -> Self {
        Self {
            now: HashMap::new(),
            prior: HashMap::new(),
            winners: Vec::new(),
            positions: Vec::new(),
            unknown: Vec::new(),
            ranking_error: None,
            rank_calls: Cell::new(0),
        }
    }

    pub fn with_price(mut self, code: &str, prior: f64, now: f64) -> Self {
        self.prior.insert(code.to_string(), prior);
        self.now.insert(code.to_string(), now);
        self
    }

    pub fn with_winners(mut self, codes: &[&str]) -> Self {
        self.winners = ranked(codes);
        self
    }

    pub fn with_position(mut self, code: &str, quantity: i64) -> Self {
        self.positions.push(Position::new(code, quantity));
        self
    }

    pub fn with_unknown(mut self, code: &str) -> Self {
        self.unknown.push(code.to_string());
        self
    }

    pub fn with_ranking_error(mut self, reason: &str) -> Self {
        self.ranking_error = Some(reason.to_string());
        self
    }
}

impl RankingPort for MockMarket {
    fn rank(&self, _lookback: usize, top_n: usize) -> Result<Vec<Candidate>, CountertrendError> {
        self.rank_calls.set(self.rank_calls.get() + 1);
        if let Some(reason) = &self.ranking_error {
            return Err(CountertrendError::Source {
                reason: reason.clone(),
            });
        }
        Ok(self.winners.iter().take(top_n).cloned().collect())
    }
}

impl MarketDataPort for MockMarket {
    fn prices_now(&self, codes: &[String]) -> Result<PriceSnapshot, CountertrendError> {
        Ok(PriceSnapshot::from_pairs(
            SnapshotKind::Intraday,
            codes
                .iter()
                .filter_map(|c| self.now.get(c).map(|&p| (c.clone(), p))),
        ))
    }

    fn prices_prior_close(&self, codes: &[String]) -> Result<PriceSnapshot, CountertrendError> {
        Ok(PriceSnapshot::from_pairs(
            SnapshotKind::PriorClose,
            codes
                .iter()
                .filter_map(|c| self.prior.get(c).map(|&p| (c.clone(), p))),
        ))
    }
}

impl PortfolioPort for MockMarket {
    fn positions(&self) -> Result<Holdings, CountertrendError> {
        Ok(Holdings::from_positions(self.positions.clone())?)
    }
}

impl AssetRegistry for MockMarket {
    fn resolve(&self, code: &str) -> bool {
        !self.unknown.iter().any(|u| u == code)
    }
}

/// Sink that records every submission.
#[derive(Default)]
pub struct RecordingSink {
    pub batches: Vec<Vec<Decision>>,
}

impl ExecutionSink for RecordingSink {
    fn submit(&mut self, decisions: &[Decision]) -> Result<(), CountertrendError> {
        self.batches.push(decisions.to_vec());
        Ok(())
    }
}

pub fn ranked(codes: &[&str]) -> Vec<Candidate> {
    codes
        .iter()
        .enumerate()
        .map(|(i, c)| Candidate::new(*c, i as u32 + 1, 0.1 / (i as f64 + 1.0)))
        .collect()
}

pub fn candidate_set(codes: &[&str]) -> CandidateSet {
    CandidateSet::new(ranked(codes)).unwrap()
}

pub fn holdings(positions: &[(&str, i64)]) -> Holdings {
    Holdings::from_positions(
        positions
            .iter()
            .map(|&(c, q)| Position::new(c, q))
            .collect(),
    )
    .unwrap()
}

pub fn snapshot(kind: SnapshotKind, pairs: &[(&str, f64)]) -> PriceSnapshot {
    PriceSnapshot::from_pairs(kind, pairs.iter().copied())
}

pub fn summary(decisions: &[Decision]) -> Vec<(Action, String)> {
    decisions
        .iter()
        .map(|d| (d.action, d.code.clone()))
        .collect()
}

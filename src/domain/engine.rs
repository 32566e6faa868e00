//! Rebalance decision engine for the intraday counter-trend rule.
//!
//! Every winner that is down for the day relative to its prior close and not
//! yet held is entered; every holding that fell out of the winner list is
//! exited. The engine is a pure function of its inputs: all prices are
//! validated up front, so an invocation either yields the full decision list
//! or an error and nothing else.
//!
//! Output order: exits (holdings order), enters (rank order), holds (rank order).

use std::collections::HashMap;

use tracing::debug;

use crate::domain::candidate::CandidateSet;
use crate::domain::decision::{Decision, Reason};
use crate::domain::error::{ConfigurationError, CountertrendError, DataError};
use crate::domain::portfolio::Holdings;
use crate::domain::snapshot::PriceSnapshot;
use crate::ports::asset_registry::AssetRegistry;

/// (now - prior) / prior
///
/// A zero or negative prior close is a data error rather than an infinite or
/// sign-flipped return.
pub fn intraday_return(code: &str, now: f64, prior_close: f64) -> Result<f64, DataError> {
    if prior_close == 0.0 {
        return Err(DataError::ZeroPriorClose {
            code: code.to_string(),
        });
    }
    if prior_close < 0.0 {
        return Err(DataError::NonPositivePriorClose {
            code: code.to_string(),
            price: prior_close,
        });
    }
    Ok((now - prior_close) / prior_close)
}

/// Decide entries, exits and holds for one rebalance.
pub fn decide(
    candidates: &CandidateSet,
    positions: &Holdings,
    prices_now: &PriceSnapshot,
    prices_prior_close: &PriceSnapshot,
) -> Result<Vec<Decision>, CountertrendError> {
    // Validate every referenced code before emitting anything.
    let mut referenced: Vec<&str> = positions.codes().collect();
    referenced.extend(candidates.codes().filter(|c| !positions.has_position(c)));

    let mut returns: HashMap<&str, f64> = HashMap::with_capacity(referenced.len());
    for code in referenced {
        let now = prices_now.price(code)?;
        let prior = prices_prior_close.price(code)?;
        returns.insert(code, intraday_return(code, now, prior)?);
    }

    let mut exits = Vec::new();
    for position in positions {
        if !candidates.contains(&position.code) {
            exits.push(Decision::exit(position.code.clone()));
        }
    }

    let mut enters = Vec::new();
    let mut holds = Vec::new();
    for candidate in candidates {
        let r = returns[candidate.code.as_str()];
        if positions.has_position(&candidate.code) {
            holds.push(Decision::hold(
                candidate.code.clone(),
                Reason::AlreadyHeld { intraday_return: r },
            ));
        } else if r < 0.0 {
            enters.push(Decision::enter(candidate.code.clone(), r));
        } else {
            holds.push(Decision::hold(
                candidate.code.clone(),
                Reason::NotDown { intraday_return: r },
            ));
        }
    }

    let mut decisions = exits;
    decisions.append(&mut enters);
    decisions.append(&mut holds);

    for d in &decisions {
        debug!(code = %d.code, action = %d.action, reason = %d.reason, "decision");
    }

    Ok(decisions)
}

/// [`decide`] guarded by an asset registry: candidates the registry cannot
/// resolve indicate an upstream ranking defect and are refused.
pub struct RebalanceDecisionEngine<'a> {
    registry: &'a dyn AssetRegistry,
}

impl<'a> RebalanceDecisionEngine<'a> {
    pub fn new(registry: &'a dyn AssetRegistry) -> Self {
        Self { registry }
    }

    pub fn decide(
        &self,
        candidates: &CandidateSet,
        positions: &Holdings,
        prices_now: &PriceSnapshot,
        prices_prior_close: &PriceSnapshot,
    ) -> Result<Vec<Decision>, CountertrendError> {
        if let Some(code) = candidates.codes().find(|c| !self.registry.resolve(c)) {
            return Err(ConfigurationError::UnknownAsset {
                code: code.to_string(),
            }
            .into());
        }
        decide(candidates, positions, prices_now, prices_prior_close)
    }
}

//! Point-in-time price snapshots keyed by instrument code.

use std::collections::HashMap;
use std::fmt;

use crate::domain::error::DataError;

/// Which observation a snapshot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKind {
    /// Price as of the rebalance minute.
    Intraday,
    /// Close of the previous session.
    PriorClose,
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotKind::Intraday => write!(f, "intraday"),
            SnapshotKind::PriorClose => write!(f, "prior close"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSnapshot {
    pub kind: SnapshotKind,
    prices: HashMap<String, f64>,
}

impl PriceSnapshot {
    pub fn new(kind: SnapshotKind) -> Self {
        Self {
            kind,
            prices: HashMap::new(),
        }
    }

    pub fn from_pairs<I, S>(kind: SnapshotKind, pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            kind,
            prices: pairs.into_iter().map(|(c, p)| (c.into(), p)).collect(),
        }
    }

    pub fn insert(&mut self, code: impl Into<String>, price: f64) {
        self.prices.insert(code.into(), price);
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.prices.get(code).copied()
    }

    /// Look up a price, rejecting missing and non-finite values.
    pub fn price(&self, code: &str) -> Result<f64, DataError> {
        let price = self.get(code).ok_or_else(|| DataError::MissingPrice {
            code: code.to_string(),
            kind: self.kind,
        })?;
        if !price.is_finite() {
            return Err(DataError::InvalidPrice {
                code: code.to_string(),
                kind: self.kind,
                price,
            });
        }
        Ok(price)
    }
}

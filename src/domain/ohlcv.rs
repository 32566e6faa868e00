//! Daily OHLCV bars and per-instrument price history.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Date-ordered bars for one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistory {
    pub code: String,
    pub bars: Vec<OhlcvBar>,
}

impl PriceHistory {
    pub fn new(code: impl Into<String>, mut bars: Vec<OhlcvBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        Self {
            code: code.into(),
            bars,
        }
    }

    /// Bars dated strictly before `session`, so nothing from the session
    /// being traded leaks into ranking or the prior close.
    pub fn before(&self, session: NaiveDate) -> &[OhlcvBar] {
        let end = self.bars.partition_point(|b| b.date < session);
        &self.bars[..end]
    }

    /// Close of the last complete session before `session`.
    pub fn prior_close(&self, session: NaiveDate) -> Option<f64> {
        self.before(session).last().map(|b| b.close)
    }
}

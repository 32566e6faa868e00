//! Top-N "winners" by trailing return.
//!
//! trailing_return(n) = (C[last] - C[last-n]) / C[last-n]
//! Instruments with fewer than n + 1 bars or a zero base close are not ranked.

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::candidate::Candidate;
use crate::domain::ohlcv::{OhlcvBar, PriceHistory};

pub fn trailing_return(bars: &[OhlcvBar], lookback: usize) -> Option<f64> {
    if lookback == 0 || bars.len() <= lookback {
        return None;
    }
    let last = bars[bars.len() - 1].close;
    let base = bars[bars.len() - 1 - lookback].close;
    if base == 0.0 {
        return None;
    }
    Some((last - base) / base)
}

/// Rank histories by trailing return as of the close before `session`.
/// Ties are broken by code so the ordering is reproducible.
pub fn rank_winners(
    histories: &[PriceHistory],
    session: NaiveDate,
    lookback: usize,
    top_n: usize,
) -> Vec<Candidate> {
    let mut scored: Vec<(&str, f64)> = histories
        .iter()
        .filter_map(|h| match trailing_return(h.before(session), lookback) {
            Some(score) if score.is_finite() => Some((h.code.as_str(), score)),
            _ => {
                warn!(code = %h.code, lookback, "not enough history to rank");
                None
            }
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    scored
        .into_iter()
        .take(top_n)
        .zip(1u32..)
        .map(|((code, score), rank)| Candidate::new(code, rank, score))
        .collect()
}

//! Market data port trait.

use crate::domain::error::CountertrendError;
use crate::domain::snapshot::PriceSnapshot;

/// Source of the two price snapshots a rebalance compares.
///
/// Codes without a price are left out of the snapshot rather than reported
/// here; the decision engine turns the gap into a data error.
pub trait MarketDataPort {
    fn prices_now(&self, codes: &[String]) -> Result<PriceSnapshot, CountertrendError>;

    fn prices_prior_close(&self, codes: &[String]) -> Result<PriceSnapshot, CountertrendError>;
}

//! Ranking port trait.

use crate::domain::candidate::Candidate;
use crate::domain::error::CountertrendError;

/// Yields the day's winners once per session, best first.
pub trait RankingPort {
    fn rank(&self, lookback: usize, top_n: usize) -> Result<Vec<Candidate>, CountertrendError>;
}

//! Daily candidate list ("winners") produced by the ranking step.

use std::collections::HashSet;

use crate::domain::error::ConfigurationError;

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub code: String,
    /// 1 is the best-ranked candidate.
    pub rank: u32,
    /// Trailing return the rank was derived from.
    pub score: f64,
}

impl Candidate {
    pub fn new(code: impl Into<String>, rank: u32, score: f64) -> Self {
        Self {
            code: code.into(),
            rank,
            score,
        }
    }
}

/// Candidates validated for uniqueness and held in rank order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    pub fn new(mut candidates: Vec<Candidate>) -> Result<Self, ConfigurationError> {
        let mut codes = HashSet::new();
        let mut ranks = HashSet::new();

        for c in &candidates {
            if !codes.insert(c.code.as_str()) {
                return Err(ConfigurationError::DuplicateCandidate {
                    code: c.code.clone(),
                });
            }
            if !ranks.insert(c.rank) {
                return Err(ConfigurationError::DuplicateRank { rank: c.rank });
            }
        }

        candidates.sort_by_key(|c| c.rank);
        Ok(Self { candidates })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.candidates.iter().any(|c| c.code == code)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|c| c.code.as_str())
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

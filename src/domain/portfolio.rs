//! Current holdings, kept in the order the portfolio provider supplied them.

use super::error::DataError;
use super::position::Position;
use super::snapshot::PriceSnapshot;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Holdings {
    positions: Vec<Position>,
}

impl Holdings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positions(positions: Vec<Position>) -> Result<Self, DataError> {
        let mut holdings = Self::new();
        for position in positions {
            holdings.add_position(position)?;
        }
        Ok(holdings)
    }

    pub fn add_position(&mut self, position: Position) -> Result<(), DataError> {
        if self.has_position(&position.code) {
            return Err(DataError::DuplicatePosition {
                code: position.code,
            });
        }
        self.positions.push(position);
        Ok(())
    }

    pub fn get_position(&self, code: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.code == code)
    }

    pub fn has_position(&self, code: &str) -> bool {
        self.get_position(code).is_some()
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Position> {
        self.positions.iter()
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.positions.iter().map(|p| p.code.as_str())
    }

    /// Sum of absolute market values; positions without a price are skipped.
    pub fn gross_exposure(&self, prices: &PriceSnapshot) -> f64 {
        self.positions
            .iter()
            .filter_map(|pos| prices.get(&pos.code).map(|price| pos.market_value(price)))
            .sum()
    }
}

impl<'a> IntoIterator for &'a Holdings {
    type Item = &'a Position;
    type IntoIter = std::slice::Iter<'a, Position>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! Held positions as reported by the portfolio provider.

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub code: String,
    /// Signed share count: positive long, negative short.
    pub quantity: i64,
}

impl Position {
    pub fn new(code: impl Into<String>, quantity: i64) -> Self {
        Self {
            code: code.into(),
            quantity,
        }
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity.unsigned_abs() as f64 * price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_keeps_signed_quantity() {
        let pos = Position::new("AAPL", -50);
        assert_eq!(pos.code, "AAPL");
        assert_eq!(pos.quantity, -50);
    }

    #[test]
    fn market_value_ignores_side() {
        assert!((Position::new("AAPL", 10).market_value(20.0) - 200.0).abs() < f64::EPSILON);
        assert!((Position::new("AAPL", -10).market_value(20.0) - 200.0).abs() < f64::EPSILON);
    }
}

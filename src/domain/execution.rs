//! Translation of decisions into target-weight orders.
//!
//! Enter targets a fixed fraction of portfolio value, Exit targets zero,
//! Hold produces no order.

use super::decision::{Action, Decision};

#[derive(Debug, Clone, PartialEq)]
pub struct OrderIntent {
    pub code: String,
    /// Fraction of portfolio value to hold after the order fills.
    pub target_weight: f64,
}

/// Equal weight across `top_n` winners.
pub fn equal_weight(top_n: usize) -> f64 {
    if top_n == 0 {
        return 0.0;
    }
    1.0 / top_n as f64
}

/// Target weight a decision asks for, `None` for holds.
pub fn target_weight_for(decision: &Decision, entry_weight: f64) -> Option<f64> {
    match decision.action {
        Action::Enter => Some(entry_weight),
        Action::Exit => Some(0.0),
        Action::Hold => None,
    }
}

pub fn plan_orders(decisions: &[Decision], entry_weight: f64) -> Vec<OrderIntent> {
    decisions
        .iter()
        .filter_map(|d| {
            target_weight_for(d, entry_weight).map(|target_weight| OrderIntent {
                code: d.code.clone(),
                target_weight,
            })
        })
        .collect()
}

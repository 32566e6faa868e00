//! Execution sink port trait.

use crate::domain::decision::Decision;
use crate::domain::error::CountertrendError;

pub trait ExecutionSink {
    /// Accept one rebalance's decisions, in engine order.
    fn submit(&mut self, decisions: &[Decision]) -> Result<(), CountertrendError>;
}

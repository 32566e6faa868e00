//! Port traits for the collaborators a rebalance depends on.

pub mod asset_registry;
pub mod config_port;
pub mod execution_port;
pub mod market_data_port;
pub mod portfolio_port;
pub mod ranking_port;

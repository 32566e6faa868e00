//! Core domain types and the rebalance decision logic.

pub mod candidate;
pub mod config_validation;
pub mod decision;
pub mod engine;
pub mod error;
pub mod execution;
pub mod ohlcv;
pub mod portfolio;
pub mod position;
pub mod ranking;
pub mod rebalance;
pub mod snapshot;
